use thiserror::Error;

use crate::Id;

/// Failures raised by [`super::ContainerSpace`] geometric operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceError {
    #[error("position conflicts with an existing occupant or container bounds")]
    Conflict,

    #[error("item {0} not found in container")]
    NotFound(Id),
}
