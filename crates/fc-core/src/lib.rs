//! `fc-core` — foundational types for the floor coordination engine.
//!
//! This crate is a dependency of every other `fc-*` crate.  It intentionally
//! has no `fc-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `EntityId`                                            |
//! | [`geo`]         | `Vec2` floor-plane vector (x, z)                      |
//! | [`kind`]        | `EntityKind` (worker / forklift)                      |
//! | [`time`]        | `Tick`, `FrameClock` (delta clamping)                 |
//! | [`config`]      | `CoordinationConfig` — every tunable constant         |
//! | [`throttle`]    | `Throttle`, `Throttled<T>`                            |
//! | [`error`]       | `FcError`, `FcResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod throttle;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::CoordinationConfig;
pub use error::{FcError, FcResult};
pub use geo::Vec2;
pub use ids::EntityId;
pub use kind::EntityKind;
pub use throttle::{Throttle, Throttled};
pub use time::{FrameClock, Tick};
