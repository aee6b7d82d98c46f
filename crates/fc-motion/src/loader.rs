//! CSV patrol-route loader.
//!
//! # CSV format
//!
//! One row per waypoint.  Rows may appear in any order; each agent's rows are
//! sorted by `waypoint` before the path is built.
//!
//! ```csv
//! agent_id,kind,waypoint,x,z,action,duration_secs
//! fl-1,forklift,0,0.0,0.0,pickup,2.0
//! fl-1,forklift,1,20.0,0.0,dropoff,2.0
//! w-1,worker,0,5.0,-3.0,none,
//! w-1,worker,1,5.0,8.0,,
//! ```
//!
//! `action` is `pickup`, `dropoff` or `none`; empty means `none`.
//! `duration_secs` may be empty for `none`.  All rows of one agent must
//! agree on `kind`, and waypoint numbers must be unique per agent.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fc_core::{EntityId, EntityKind, Vec2};

use crate::path::{Action, ActionKind, PatrolPath};
use crate::{AgentSpec, MotionError, MotionResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    agent_id:      String,
    kind:          String,
    waypoint:      u32,
    x:             f32,
    z:             f32,
    action:        String,
    duration_secs: Option<f32>,
}

/// One agent's route as read from CSV, before a speed is assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteSpec {
    pub id:   EntityId,
    pub kind: EntityKind,
    pub path: PatrolPath,
}

impl RouteSpec {
    /// Turn the route into a spawnable [`AgentSpec`] with `base_speed`.
    pub fn into_agent(self, base_speed: f32) -> AgentSpec {
        AgentSpec {
            id: self.id,
            kind: self.kind,
            path: self.path,
            base_speed,
            carrying_cargo: false,
            start: None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every route in the CSV file at `path`, ordered by agent id.
pub fn load_routes_csv(path: &Path) -> MotionResult<Vec<RouteSpec>> {
    let file = std::fs::File::open(path)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R) -> MotionResult<Vec<RouteSpec>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_agent: BTreeMap<String, Vec<RouteRecord>> = BTreeMap::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| MotionError::Parse(e.to_string()))?;
        by_agent.entry(row.agent_id.clone()).or_default().push(row);
    }

    by_agent
        .into_iter()
        .map(|(id, rows)| build_route(id, rows))
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn build_route(id: String, mut rows: Vec<RouteRecord>) -> MotionResult<RouteSpec> {
    rows.sort_by_key(|r| r.waypoint);

    let kind_str = rows[0].kind.as_str();
    let kind = EntityKind::parse(kind_str).ok_or_else(|| {
        MotionError::Parse(format!("agent {id:?}: unknown kind {kind_str:?}"))
    })?;

    let mut waypoints = Vec::with_capacity(rows.len());
    let mut actions   = Vec::with_capacity(rows.len());

    for (i, r) in rows.iter().enumerate() {
        if EntityKind::parse(&r.kind) != Some(kind) {
            return Err(MotionError::Parse(format!(
                "agent {id:?}: rows disagree on kind ({:?} vs {:?})",
                kind.as_str(),
                r.kind
            )));
        }
        if i > 0 && rows[i - 1].waypoint == r.waypoint {
            return Err(MotionError::Parse(format!(
                "agent {id:?}: waypoint {} listed twice",
                r.waypoint
            )));
        }
        let action_kind = ActionKind::parse(&r.action).ok_or_else(|| {
            MotionError::Parse(format!("agent {id:?}: unknown action {:?}", r.action))
        })?;

        waypoints.push(Vec2::new(r.x, r.z));
        actions.push(Action { kind: action_kind, duration_secs: r.duration_secs.unwrap_or(0.0) });
    }

    Ok(RouteSpec { id: EntityId::new(id), kind, path: PatrolPath::new(waypoints, actions)? })
}
