use fc_core::{EntityId, FcError};
use fc_motion::MotionError;
use fc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("agent {0} is already on the floor")]
    DuplicateAgent(EntityId),

    #[error("{0} is driven by a controller and cannot be placed externally")]
    OwnedByController(EntityId),

    #[error("{0} is an external entity and cannot be spawned as an agent")]
    OwnedExternally(EntityId),

    #[error("external entity {0} has a non-finite position")]
    NonFinitePosition(EntityId),

    #[error(transparent)]
    Core(#[from] FcError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Motion(#[from] MotionError),
}

pub type SimResult<T> = Result<T, SimError>;
