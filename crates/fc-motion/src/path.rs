//! Pre-authored circular patrol paths.

use fc_core::Vec2;

use crate::{MotionError, MotionResult};

/// What an agent does on reaching a waypoint.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum ActionKind {
    /// Lift a load, if not already carrying one.
    Pickup,
    /// Set the load down, if carrying one.
    Dropoff,
    /// Drive straight on to the next waypoint.
    #[default]
    None,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Pickup  => "pickup",
            ActionKind::Dropoff => "dropoff",
            ActionKind::None    => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pickup"        => Some(ActionKind::Pickup),
            "dropoff"       => Some(ActionKind::Dropoff),
            "none" | ""     => Some(ActionKind::None),
            _               => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action attached to one waypoint.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Action {
    pub kind:          ActionKind,
    /// Seconds the load/unload takes.  Ignored for [`ActionKind::None`].
    pub duration_secs: f32,
}

impl Action {
    pub const NONE: Action = Action { kind: ActionKind::None, duration_secs: 0.0 };

    pub fn pickup(duration_secs: f32) -> Self {
        Self { kind: ActionKind::Pickup, duration_secs }
    }

    pub fn dropoff(duration_secs: f32) -> Self {
        Self { kind: ActionKind::Dropoff, duration_secs }
    }
}

/// An ordered, circular list of waypoints with one action per waypoint.
///
/// Construction is the only validation point: a `PatrolPath` always has at
/// least one waypoint, exactly one action per waypoint, finite positions, and
/// a positive finite duration on every pickup/dropoff.
#[derive(Clone, Debug, PartialEq)]
pub struct PatrolPath {
    waypoints: Vec<Vec2>,
    actions:   Vec<Action>,
}

impl PatrolPath {
    pub fn new(waypoints: Vec<Vec2>, actions: Vec<Action>) -> MotionResult<Self> {
        if waypoints.is_empty() {
            return Err(MotionError::EmptyPath);
        }
        if waypoints.len() != actions.len() {
            return Err(MotionError::LengthMismatch {
                waypoints: waypoints.len(),
                actions:   actions.len(),
            });
        }
        if let Some(index) = waypoints.iter().position(|w| !w.is_finite()) {
            return Err(MotionError::NonFiniteWaypoint { index });
        }
        for (index, a) in actions.iter().enumerate() {
            let needs_duration = matches!(a.kind, ActionKind::Pickup | ActionKind::Dropoff);
            if needs_duration && !(a.duration_secs.is_finite() && a.duration_secs > 0.0) {
                return Err(MotionError::InvalidDuration {
                    index,
                    kind:     a.kind.as_str(),
                    duration: a.duration_secs,
                });
            }
        }
        Ok(Self { waypoints, actions })
    }

    /// A path with no actions at all: a plain patrol loop.
    pub fn patrol(waypoints: Vec<Vec2>) -> MotionResult<Self> {
        let actions = vec![Action::NONE; waypoints.len()];
        Self::new(waypoints, actions)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn waypoint(&self, index: usize) -> Vec2 {
        self.waypoints[index % self.waypoints.len()]
    }

    #[inline]
    pub fn action(&self, index: usize) -> Action {
        self.actions[index % self.actions.len()]
    }

    /// Index after `index`, wrapping to 0 after the last waypoint.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.waypoints.len()
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}
