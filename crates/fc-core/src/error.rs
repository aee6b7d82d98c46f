//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FcError` as one variant
//! via `#[from]`, so configuration failures bubble up unchanged.

use thiserror::Error;

use crate::EntityId;

/// The top-level error type for `fc-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FcError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fc-core`.
pub type FcResult<T> = Result<T, FcError>;
