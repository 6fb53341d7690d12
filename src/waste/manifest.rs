use serde::{Deserialize, Serialize};

use super::planner::ReturnItem;
use crate::Id;

/// Summary of a return plan's selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnManifest {
    pub undocking_container_id: Id,
    pub undocking_date: chrono::DateTime<chrono::Utc>,
    pub return_items: Vec<ReturnItem>,
    pub total_volume: u64,
    pub total_weight: f64,
}
