//! Tuning constants for collision avoidance, crossing arbitration and the
//! movement state machine.
//!
//! Units: distances in world units (metres on the reference floor plan),
//! durations in seconds, speeds in world units per second.  Every field has
//! a default reproducing the reference floor's behavior; applications
//! override individual fields (with the `serde` feature, any missing field
//! in a config file falls back to its default).

use crate::{FcError, FcResult};

/// Every tunable constant used by the coordination engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoordinationConfig {
    // ── Collision avoidance ───────────────────────────────────────────────
    /// A forklift stops if any worker is closer than this, either around it
    /// or around any look-ahead sample point.  Default 2.5.
    pub worker_safety_radius: f32,

    /// A forklift stops if any other forklift is closer than this.
    /// Default 4.0.
    pub forklift_safety_radius: f32,

    /// How far ahead `path_clear` samples the travel direction.  Default 5.0.
    pub path_look_ahead: f32,

    /// Minimum normalized dot product for a peer to count as heading
    /// towards a point.  Default 0.3.
    pub approach_dot_threshold: f32,

    // ── Stopped-state hysteresis ──────────────────────────────────────────
    /// How long a raw safe/unsafe change must persist before the published
    /// stopped state follows it.  Default 0.15.
    pub hysteresis_dwell_secs: f32,

    // ── Crossing zones ────────────────────────────────────────────────────
    /// Continuous approach time required before entering a zone.  Default 1.5.
    pub crossing_wait_secs: f32,

    /// Distance ahead of the agent used to detect an upcoming zone.
    /// Default 3.0.
    pub crossing_look_ahead: f32,

    /// Speed multiplier while approaching a zone.  Default 0.5.
    pub crossing_approach_speed_factor: f32,

    /// Speed multiplier while inside a zone.  Default 0.6.
    pub crossing_inside_speed_factor: f32,

    // ── Movement ──────────────────────────────────────────────────────────
    /// A waypoint closer than this counts as reached.  Default 0.5.
    pub arrival_threshold: f32,

    /// Dot product of consecutive travel directions below which the agent
    /// is reported as reversing.  Default -0.5.
    pub reverse_dot_threshold: f32,

    /// Facing-smoothing rate, fraction of the remaining turn closed per
    /// second (capped at a full turn per tick).  Default 8.0.
    pub turn_rate: f32,

    /// Peak fork height reached halfway through a load/unload.  Default 1.2.
    pub lift_max_height: f32,

    // ── Tick loop ─────────────────────────────────────────────────────────
    /// Frame deltas are clamped to this before use.  Default 0.1 (100 ms).
    pub max_delta_secs: f32,

    /// Run each forklift's registry obstruction scan every N ticks, reusing
    /// the cached verdict in between.  1 = every tick.  Default 1.
    pub collision_check_interval: u32,

    /// Deliver a snapshot to observers every N ticks.  0 disables
    /// snapshots.  Default 1.
    pub snapshot_interval_ticks: u32,
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            worker_safety_radius:           2.5,
            forklift_safety_radius:         4.0,
            path_look_ahead:                5.0,
            approach_dot_threshold:         0.3,
            hysteresis_dwell_secs:          0.15,
            crossing_wait_secs:             1.5,
            crossing_look_ahead:            3.0,
            crossing_approach_speed_factor: 0.5,
            crossing_inside_speed_factor:   0.6,
            arrival_threshold:              0.5,
            reverse_dot_threshold:          -0.5,
            turn_rate:                      8.0,
            lift_max_height:                1.2,
            max_delta_secs:                 0.1,
            collision_check_interval:       1,
            snapshot_interval_ticks:        1,
        }
    }
}

impl CoordinationConfig {
    /// Reject values the engine cannot run with.
    ///
    /// Distances, durations and rates must be finite and non-negative; the
    /// delta clamp and arrival threshold must be strictly positive; speed
    /// factors must lie in `(0, 1]`.
    pub fn validate(&self) -> FcResult<()> {
        let non_negative = [
            ("worker_safety_radius",   self.worker_safety_radius),
            ("forklift_safety_radius", self.forklift_safety_radius),
            ("path_look_ahead",        self.path_look_ahead),
            ("hysteresis_dwell_secs",  self.hysteresis_dwell_secs),
            ("crossing_wait_secs",     self.crossing_wait_secs),
            ("crossing_look_ahead",    self.crossing_look_ahead),
            ("turn_rate",              self.turn_rate),
            ("lift_max_height",        self.lift_max_height),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FcError::Config(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }

        let positive = [
            ("arrival_threshold", self.arrival_threshold),
            ("max_delta_secs",    self.max_delta_secs),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FcError::Config(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        let factors = [
            ("crossing_approach_speed_factor", self.crossing_approach_speed_factor),
            ("crossing_inside_speed_factor",   self.crossing_inside_speed_factor),
        ];
        for (name, value) in factors {
            if !(value > 0.0 && value <= 1.0) {
                return Err(FcError::Config(format!(
                    "{name} must lie in (0, 1], got {value}"
                )));
            }
        }

        let dots = [
            ("approach_dot_threshold", self.approach_dot_threshold),
            ("reverse_dot_threshold",  self.reverse_dot_threshold),
        ];
        for (name, value) in dots {
            if !(-1.0..=1.0).contains(&value) {
                return Err(FcError::Config(format!(
                    "{name} must lie in [-1, 1], got {value}"
                )));
            }
        }

        Ok(())
    }
}
