//! Placement Planner (spec §4.2): 3D bin packing under priority, zone, and
//! accessibility constraints, with rearrangement fallback.

mod planner;
mod rearrangement;
mod scoring;

pub use planner::{place_batch, PlacementOutcome};
pub use rearrangement::Move;
