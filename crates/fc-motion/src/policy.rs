//! The collision-avoidance policy: may this forklift advance this tick?
//!
//! ```text
//! safe = path_clear(ahead, worker radius, self, look-ahead)
//!      ∧ no worker within the worker radius
//!      ∧ no other forklift within the forklift radius
//!      ∧ crossing clear
//! ```
//!
//! The registry part (`obstruction`) is the expensive scan and the one the
//! controller throttles; the crossing part is cheap and evaluated every tick.

use fc_core::{CoordinationConfig, EntityKind, Vec2};
use fc_spatial::{Registry, is_approaching};

use crate::CrossingAssessment;

/// Why a forklift is holding position.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BlockReason {
    /// A worker or another forklift is in the lane ahead.
    PathObstructed,
    /// A worker is inside the safety radius.
    WorkerNearby,
    /// Another forklift is inside the safety radius.  `approaching` is true
    /// if at least one of them is driving towards us.
    ForkliftNearby { approaching: bool },
    /// Waiting at a crossing-zone boundary.
    CrossingYield,
}

impl BlockReason {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockReason::PathObstructed                        => "path_obstructed",
            BlockReason::WorkerNearby                          => "worker_nearby",
            BlockReason::ForkliftNearby { approaching: true }  => "forklift_approaching",
            BlockReason::ForkliftNearby { approaching: false } => "forklift_nearby",
            BlockReason::CrossingYield                         => "crossing_yield",
        }
    }
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of everything the policy consults.
pub struct CollisionPolicy<'a> {
    pub registry: &'a Registry,
    pub config:   &'a CoordinationConfig,
}

impl<'a> CollisionPolicy<'a> {
    pub fn new(registry: &'a Registry, config: &'a CoordinationConfig) -> Self {
        Self { registry, config }
    }

    /// Registry scan for `self_id` at `pos` heading along `direction`.
    /// `None` means nothing in the registry stops us.
    pub fn obstruction(&self, self_id: &str, pos: Vec2, direction: Vec2) -> Option<BlockReason> {
        let cfg = self.config;

        if !self.registry.path_clear(
            pos,
            direction,
            cfg.path_look_ahead,
            cfg.worker_safety_radius,
            Some(self_id),
        ) {
            return Some(BlockReason::PathObstructed);
        }

        if self.registry.any_nearby(pos, cfg.worker_safety_radius, EntityKind::Worker, Some(self_id)) {
            return Some(BlockReason::WorkerNearby);
        }

        let peers = self.registry.nearby(pos, cfg.forklift_safety_radius, EntityKind::Forklift, Some(self_id));
        if !peers.is_empty() {
            let approaching = peers
                .iter()
                .any(|p| is_approaching(pos, p, cfg.approach_dot_threshold));
            return Some(BlockReason::ForkliftNearby { approaching });
        }

        None
    }

    /// Combine a (possibly cached) registry verdict with this tick's
    /// crossing assessment.  `None` means safe to advance.
    pub fn decide(
        obstruction: Option<BlockReason>,
        crossing:    &CrossingAssessment,
    ) -> Option<BlockReason> {
        obstruction.or((!crossing.clear).then_some(BlockReason::CrossingYield))
    }
}
