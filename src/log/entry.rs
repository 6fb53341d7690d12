use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Id;

/// Kinds of core mutation the action log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Add,
    Placement,
    Retrieval,
    Waste,
    Disposal,
    Search,
    Rearrange,
}

/// A single append-only log entry. `details` is an open map so additive
/// fields never require a schema migration.
///
/// `seq` is the auto-id the persisted log collection is keyed by; it is
/// assigned by the [`Store`](crate::store::Store) on append, so entries
/// constructed before that point carry `seq: 0`. `Store::append_log` takes
/// the entry by value and returns nothing, so the real assigned `seq` lives
/// only in the store's own persisted copy — the [`Engine`](crate::engine::Engine)'s
/// in-process log mirror keeps whatever `seq` the entry was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub action_type: ActionType,
    pub item_id: Id,
    pub user_id: Option<String>,
    pub details: Value,
}

impl LogEntry {
    pub fn new(timestamp: DateTime<Utc>, action_type: ActionType, item_id: impl Into<Id>) -> Self {
        Self {
            seq: 0,
            timestamp,
            action_type,
            item_id: item_id.into(),
            user_id: None,
            details: Value::Object(Default::default()),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}
