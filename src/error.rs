//! Unified error type. Every narrower, component-specific error enum converts
//! into this one via `From`, so `?` composes all the way up through [`crate::engine::Engine`]
//! without manual mapping at each call site.

use thiserror::Error;

use crate::container::SpaceError;
use crate::retrieval::RetrievalError;
use crate::simulator::SimulatorError;
use crate::Id;

/// Error kinds surfaced by the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate id: {0}")]
    Duplicate(Id),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<SpaceError> for Error {
    fn from(e: SpaceError) -> Self {
        match e {
            SpaceError::Conflict => Error::Conflict("position conflicts with an existing occupant or container bounds".into()),
            SpaceError::NotFound(id) => Error::NotFound(format!("item {id} not in container")),
        }
    }
}

impl From<RetrievalError> for Error {
    fn from(e: RetrievalError) -> Self {
        match e {
            RetrievalError::NotFound(id) => Error::NotFound(format!("item {id} not found in any container")),
        }
    }
}

impl From<SimulatorError> for Error {
    fn from(e: SimulatorError) -> Self {
        match e {
            SimulatorError::InvalidArgs(msg) => Error::InvalidArgs(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
