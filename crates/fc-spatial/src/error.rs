//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `fc-spatial`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("zone {id:?} has invalid bounds x [{x_min}, {x_max}] z [{z_min}, {z_max}]")]
    InvalidZoneBounds {
        id:    String,
        x_min: f32,
        x_max: f32,
        z_min: f32,
        z_max: f32,
    },

    #[error("duplicate zone id {0:?}")]
    DuplicateZone(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
