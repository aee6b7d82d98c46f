//! `fc-motion` — what one agent does each tick.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                         |
//! |----------------|------------------------------------------------------------------|
//! | [`path`]       | `PatrolPath`, `Action`, `ActionKind` — validated circular routes |
//! | [`crossing`]   | `assess_crossing` — approach wait and zone speed multipliers     |
//! | [`policy`]     | `CollisionPolicy`, `BlockReason` — may a forklift advance?       |
//! | [`hysteresis`] | `HysteresisGate` — raw blocked → published stopped               |
//! | [`controller`] | `MovementController` — travel / load / unload state machine      |
//! | [`event`]      | `AgentEvent` — side effects for audio, UI and minimap            |
//! | [`loader`]     | CSV route loading                                                |
//! | [`error`]      | `MotionError`, `MotionResult<T>`                                 |
//!
//! # Who is subject to the policy
//!
//! Forklifts are held by the collision policy and yield at crossing zones.
//! Workers walk their routes unconditionally; they still publish their
//! position so forklifts can avoid them.

pub mod controller;
pub mod crossing;
pub mod error;
pub mod event;
pub mod hysteresis;
pub mod loader;
pub mod path;
pub mod policy;


pub use controller::{
    AgentSnapshot, AgentSpec, AgentState, MovementController, Operation, StepContext, lift_profile,
};
pub use crossing::{CrossingAssessment, CrossingPhase, assess_crossing};
pub use error::{MotionError, MotionResult};
pub use event::AgentEvent;
pub use hysteresis::{HysteresisGate, StopTransition};
pub use loader::{RouteSpec, load_routes_csv, load_routes_reader};
pub use path::{Action, ActionKind, PatrolPath};
pub use policy::{BlockReason, CollisionPolicy};
