//! Day-stepping clock advance: expiry scan and per-day usage decrement.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::SimulatorError;
use crate::item::{Item, Status, WasteReason};
use crate::Id;

/// How far to advance the clock: either a day count or an absolute target.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    NumDays(u32),
    ToTimestamp(DateTime<Utc>),
}

/// Resolves an entry in `itemsToBeUsedPerDay` by id (preferred) or by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemRef {
    pub item_id: Option<Id>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SimulationInput {
    pub target: Target,
    pub items_to_be_used_per_day: Vec<ItemRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsedEntry {
    pub item_id: Id,
    pub remaining_uses: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationChanges {
    pub items_used: Vec<UsedEntry>,
    pub items_expired: Vec<Id>,
    pub items_depleted_today: Vec<Id>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub new_date: DateTime<Utc>,
    pub changes: SimulationChanges,
}

fn resolve<'a>(items: &'a HashMap<Id, Item>, item_ref: &ItemRef) -> Option<&'a Id> {
    if let Some(id) = &item_ref.item_id {
        return items.get(id).map(|i| &i.item_id);
    }
    let name = item_ref.name.as_ref()?;
    let mut ids: Vec<&Id> = items
        .values()
        .filter(|i| &i.name == name)
        .map(|i| &i.item_id)
        .collect();
    ids.sort();
    ids.into_iter().next()
}

/// Advances the logical `clock` by the number of days implied by `input`,
/// running the per-day expiry/usage sweep on each step.
pub fn simulate(
    input: SimulationInput,
    clock: &mut DateTime<Utc>,
    items: &mut HashMap<Id, Item>,
) -> Result<SimulationResult, SimulatorError> {
    let num_days: i64 = match input.target {
        Target::NumDays(n) => n as i64,
        Target::ToTimestamp(target) => {
            if target < *clock {
                return Err(SimulatorError::InvalidArgs(
                    "toTimestamp is before the current clock".to_string(),
                ));
            }
            (target.date_naive() - clock.date_naive()).num_days()
        }
    };

    let mut changes = SimulationChanges::default();

    for _ in 0..num_days {
        *clock += chrono::Duration::days(1);

        let mut expired: Vec<Id> = items
            .values()
            .filter(|i| {
                i.status != Status::Disposed
                    && i.status != Status::Waste
                    && i.is_expired(*clock)
            })
            .map(|i| i.item_id.clone())
            .collect();
        expired.sort();
        for id in &expired {
            items
                .get_mut(id)
                .unwrap()
                .mark_waste(WasteReason::Expired);
        }
        changes.items_expired.extend(expired);

        for item_ref in &input.items_to_be_used_per_day {
            let Some(id) = resolve(items, item_ref).cloned() else {
                continue;
            };
            let item = items.get_mut(&id).unwrap();
            if item.remaining_uses == 0 {
                continue;
            }
            item.remaining_uses -= 1;
            changes.items_used.push(UsedEntry {
                item_id: id.clone(),
                remaining_uses: item.remaining_uses,
            });
            if item.remaining_uses == 0 {
                item.mark_waste(WasteReason::OutOfUses);
                changes.items_depleted_today.push(id);
            }
        }
    }

    Ok(SimulationResult {
        new_date: *clock,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock_at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn zero_days_is_a_no_op() {
        let mut clock = clock_at(2030, 1, 1);
        let mut items = HashMap::new();
        let result = simulate(
            SimulationInput {
                target: Target::NumDays(0),
                items_to_be_used_per_day: vec![],
            },
            &mut clock,
            &mut items,
        )
        .unwrap();
        assert_eq!(result.new_date, clock_at(2030, 1, 1));
        assert!(result.changes.items_expired.is_empty());
    }

    #[test]
    fn simulating_past_expiry_marks_waste() {
        let mut clock = clock_at(2030, 1, 1);
        let mut items = HashMap::new();
        let mut e = Item::new("E", "E", 1, 1, 1, 1.0, 50, Some(clock_at(2030, 1, 3)), 5, "General");
        e.status = Status::Pending;
        items.insert("E".to_string(), e);

        let result = simulate(
            SimulationInput {
                target: Target::NumDays(3),
                items_to_be_used_per_day: vec![],
            },
            &mut clock,
            &mut items,
        )
        .unwrap();

        assert_eq!(items["E"].status, Status::Waste);
        assert_eq!(items["E"].waste_reason, Some(WasteReason::Expired));
        assert_eq!(result.changes.items_expired, vec!["E".to_string()]);
        assert_eq!(items["E"].remaining_uses, 5);
    }

    #[test]
    fn usage_decrement_reaches_depletion() {
        let mut clock = clock_at(2030, 1, 1);
        let mut items = HashMap::new();
        items.insert(
            "U".to_string(),
            Item::new("U", "U", 1, 1, 1, 1.0, 50, None, 1, "General"),
        );

        let result = simulate(
            SimulationInput {
                target: Target::NumDays(1),
                items_to_be_used_per_day: vec![ItemRef {
                    item_id: Some("U".to_string()),
                    name: None,
                }],
            },
            &mut clock,
            &mut items,
        )
        .unwrap();

        assert_eq!(items["U"].remaining_uses, 0);
        assert_eq!(items["U"].status, Status::Waste);
        assert_eq!(result.changes.items_depleted_today, vec!["U".to_string()]);
    }
}
