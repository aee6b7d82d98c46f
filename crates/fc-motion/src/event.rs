//! Side-effect events emitted by a controller for external collaborators
//! (audio cues, UI indicators, minimap).  Nothing inside the engine reacts
//! to them.

use crate::Operation;

/// One observable thing that happened to an agent during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    /// Published stopped state flipped (edge-triggered, after hysteresis).
    /// `stopped = true` is the horn cue.
    StoppedChanged { stopped: bool },

    /// Travel direction swung by more than the reverse threshold this tick
    /// (level-triggered: recomputed every tick).
    Reversing,

    /// A load or unload began at the current waypoint.
    OperationStarted { operation: Operation },

    /// A load or unload finished.
    OperationCompleted { operation: Operation },

    /// The agent's position entered a crossing zone.
    CrossingEntered { zone: String },

    /// The agent's position left a crossing zone.
    CrossingExited { zone: String },

    /// The agent reached waypoint `index`.
    WaypointReached { index: usize },
}

impl AgentEvent {
    /// Short machine-readable label (CSV column value).
    pub fn label(&self) -> &'static str {
        match self {
            AgentEvent::StoppedChanged { stopped: true }  => "stopped",
            AgentEvent::StoppedChanged { stopped: false } => "resumed",
            AgentEvent::Reversing                         => "reversing",
            AgentEvent::OperationStarted { .. }           => "operation_started",
            AgentEvent::OperationCompleted { .. }         => "operation_completed",
            AgentEvent::CrossingEntered { .. }            => "crossing_entered",
            AgentEvent::CrossingExited { .. }             => "crossing_exited",
            AgentEvent::WaypointReached { .. }            => "waypoint_reached",
        }
    }

    /// Free-form detail accompanying [`label`](Self::label).
    pub fn detail(&self) -> String {
        match self {
            AgentEvent::OperationStarted { operation }
            | AgentEvent::OperationCompleted { operation } => operation.as_str().to_owned(),
            AgentEvent::CrossingEntered { zone } | AgentEvent::CrossingExited { zone } => zone.clone(),
            AgentEvent::WaypointReached { index } => index.to_string(),
            AgentEvent::StoppedChanged { .. } | AgentEvent::Reversing => String::new(),
        }
    }
}
