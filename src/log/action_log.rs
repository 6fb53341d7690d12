use super::entry::{ActionType, LogEntry};

/// Append-only log of every successful core mutation: entries are
/// appended in non-decreasing timestamp order and never mutated.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends `entry`.
    ///
    /// # Panics
    ///
    /// Panics if `entry.timestamp` is earlier than the log's last entry.
    /// Callers always log with a monotonically advancing clock, so this
    /// should never trigger in practice.
    pub fn append(&mut self, entry: LogEntry) {
        if let Some(last) = self.entries.last() {
            assert!(
                entry.timestamp >= last.timestamp,
                "action log entries must be appended in non-decreasing timestamp order"
            );
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads all entries, optionally filtered by action type.
    pub fn read(&self, action_type: Option<ActionType>) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| action_type.map_or(true, |t| e.action_type == t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn read_filters_by_action_type() {
        let mut log = ActionLog::new();
        log.append(LogEntry::new(Utc::now(), ActionType::Add, "a"));
        log.append(LogEntry::new(Utc::now(), ActionType::Placement, "a"));

        assert_eq!(log.read(None).len(), 2);
        assert_eq!(log.read(Some(ActionType::Add)).len(), 1);
    }

    #[test]
    fn log_is_append_only_prefix() {
        let mut log = ActionLog::new();
        log.append(LogEntry::new(Utc::now(), ActionType::Add, "a"));
        let before = log.read(None).len();
        log.append(LogEntry::new(Utc::now(), ActionType::Add, "b"));
        assert_eq!(log.read(None).len(), before + 1);
    }
}
