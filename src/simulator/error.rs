use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}
