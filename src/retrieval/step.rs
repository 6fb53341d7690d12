use serde::{Deserialize, Serialize};

use crate::Id;

/// One step of a retrieval plan, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum RetrievalStep {
    Remove { item_id: Id, item_name: String },
    Retrieve { item_id: Id },
    PlaceBack { item_id: Id },
}
