use fc_core::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("patrol path has no waypoints")]
    EmptyPath,

    #[error("patrol path has {waypoints} waypoints but {actions} actions")]
    LengthMismatch { waypoints: usize, actions: usize },

    #[error("waypoint {index} is not a finite position")]
    NonFiniteWaypoint { index: usize },

    #[error("waypoint {index}: {kind} needs a positive finite duration, got {duration}")]
    InvalidDuration {
        index:    usize,
        kind:     &'static str,
        duration: f32,
    },

    #[error("agent {agent}: base speed must be positive and finite, got {speed}")]
    InvalidSpeed { agent: EntityId, speed: f32 },

    #[error("route parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MotionResult<T> = Result<T, MotionError>;
