//! Time Simulator: day-stepping, usage decrement, expiry scan.

mod error;
mod simulator;

pub use error::SimulatorError;
pub use simulator::{simulate, ItemRef, SimulationChanges, SimulationInput, SimulationResult};
