//! `fc-sim` — the floor world context and its tick loop.
//!
//! # Two-phase tick
//!
//! ```text
//! simulate(raw_delta):
//!   ⓪ Clamp     — NaN / negative → 0, anything above max_delta_secs → max.
//!   ① Read      — for each controller, ascending EntityId:
//!                   step(&registry, &zones) → (new own entry, events)
//!   ② Apply     — write every returned entry into its owner's slot.
//!   ③ Report    — on_event for each event, on_tick_end(TickReport),
//!                 on_snapshot every snapshot_interval_ticks.
//! ```
//!
//! The `Floor` owns the [`Registry`][fc_spatial::Registry]; there is no
//! global instance.  Entities driven by other systems enter it through
//! [`Floor::place_external`] and are never touched by the tick loop.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fc_core::CoordinationConfig;
//! use fc_sim::{FloorBuilder, NoopObserver};
//!
//! let mut floor = FloorBuilder::new(CoordinationConfig::default())
//!     .zones(zones)
//!     .agents(specs)
//!     .build()?;
//! let report = floor.simulate(1.0 / 60.0);
//! ```

pub mod builder;
pub mod error;
pub mod floor;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::FloorBuilder;
pub use error::{SimError, SimResult};
pub use floor::{Floor, FloorEvent, TickReport};
pub use observer::{FloorObserver, NoopObserver};
