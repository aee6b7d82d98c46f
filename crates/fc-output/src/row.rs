//! Plain data row types written by output backends.

use fc_core::Tick;
use fc_motion::AgentSnapshot;
use fc_sim::{FloorEvent, TickReport};

/// One agent's observable state at a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:          String,
    pub kind:              &'static str,
    pub tick:              u64,
    pub x:                 f32,
    pub z:                 f32,
    pub rotation:          f32,
    pub operation:         &'static str,
    pub waypoint_index:    usize,
    pub carrying_cargo:    bool,
    pub lift_height:       f32,
    pub raw_blocked:       bool,
    pub published_stopped: bool,
    /// Empty when not blocked.
    pub block_reason:      &'static str,
}

impl AgentSnapshotRow {
    pub fn from_snapshot(tick: Tick, s: &AgentSnapshot) -> Self {
        Self {
            agent_id:          s.id.to_string(),
            kind:              s.kind.as_str(),
            tick:              tick.0,
            x:                 s.position.x,
            z:                 s.position.z,
            rotation:          s.rotation,
            operation:         s.operation.as_str(),
            waypoint_index:    s.waypoint_index,
            carrying_cargo:    s.carrying_cargo,
            lift_height:       s.lift_height,
            raw_blocked:       s.raw_blocked,
            published_stopped: s.published_stopped,
            block_reason:      s.block_reason.map_or("", |r| r.as_str()),
        }
    }
}

/// One agent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:     u64,
    pub agent_id: String,
    pub event:    &'static str,
    pub detail:   String,
}

impl From<&FloorEvent> for EventRow {
    fn from(e: &FloorEvent) -> Self {
        Self {
            tick:     e.tick.0,
            agent_id: e.agent.to_string(),
            event:    e.event.label(),
            detail:   e.event.detail(),
        }
    }
}

/// Summary counts for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub delta_secs: f32,
    pub moving:     u64,
    pub blocked:    u64,
    pub stopped:    u64,
    pub events:     u64,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(r: &TickReport) -> Self {
        Self {
            tick:       r.tick.0,
            delta_secs: r.delta,
            moving:     r.moving as u64,
            blocked:    r.blocked as u64,
            stopped:    r.stopped as u64,
            events:     r.events.len() as u64,
        }
    }
}
