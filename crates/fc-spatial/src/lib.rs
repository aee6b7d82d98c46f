//! `fc-spatial` — who is where on the floor, and which parts of the floor
//! demand right-of-way.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`registry`] | `Registry`, `EntityPosition`, `is_approaching`              |
//! | [`crossing`] | `CrossingZone`, `ZoneKind`, `CrossingLayout` (R-tree backed) |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod crossing;
pub mod error;
pub mod registry;


pub use crossing::{CrossingLayout, CrossingZone, ZoneKind};
pub use error::{SpatialError, SpatialResult};
pub use registry::{
    EntityPosition, PATH_SAMPLE_START, PATH_SAMPLE_STEP, Registry, is_approaching,
};
