//! The per-agent movement state machine.
//!
//! # States
//!
//! ```text
//!            arrive (pickup, empty)          progress >= 1
//! Traveling ───────────────────────▶ Loading ─────────────▶ Traveling
//!     │      arrive (dropoff, full)          progress >= 1
//!     └────────────────────────────▶ Unloading ───────────▶ Traveling
//! ```
//!
//! Every other arrival advances the waypoint index and keeps travelling.
//!
//! # Tick contract
//!
//! [`MovementController::step`] is the read phase for one agent: it reads the
//! previous tick's [`Registry`] through the [`StepContext`], updates only its
//! own private state, and returns the entry the caller must write back in
//! the apply phase.  A controller never touches another agent's entry.

use std::f32::consts::{PI, TAU};

use tracing::debug;

use fc_core::{CoordinationConfig, EntityId, EntityKind, Throttle, Throttled, Tick, Vec2};
use fc_spatial::{CrossingLayout, EntityPosition, Registry};

use crate::{
    AgentEvent, BlockReason, CollisionPolicy, HysteresisGate, MotionError, MotionResult,
    PatrolPath, StopTransition, assess_crossing,
};
use crate::path::ActionKind;

// ── Operation ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Operation {
    #[default]
    Traveling,
    Loading,
    Unloading,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Traveling => "traveling",
            Operation::Loading   => "loading",
            Operation::Unloading => "unloading",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── AgentSpec ─────────────────────────────────────────────────────────────────

/// Everything needed to spawn one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSpec {
    pub id:             EntityId,
    pub kind:           EntityKind,
    pub path:           PatrolPath,
    /// Units per second before crossing multipliers.
    pub base_speed:     f32,
    pub carrying_cargo: bool,
    /// Spawn position.  Defaults to the first waypoint.
    pub start:          Option<Vec2>,
}

impl AgentSpec {
    pub fn forklift(id: impl Into<EntityId>, path: PatrolPath, base_speed: f32) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Forklift,
            path,
            base_speed,
            carrying_cargo: false,
            start: None,
        }
    }

    pub fn worker(id: impl Into<EntityId>, path: PatrolPath, base_speed: f32) -> Self {
        Self { kind: EntityKind::Worker, ..Self::forklift(id, path, base_speed) }
    }

    pub fn carrying(mut self, carrying_cargo: bool) -> Self {
        self.carrying_cargo = carrying_cargo;
        self
    }

    pub fn starting_at(mut self, start: Vec2) -> Self {
        self.start = Some(start);
        self
    }
}

// ── AgentState ────────────────────────────────────────────────────────────────

/// Mutable per-agent state.  Owned by exactly one [`MovementController`].
#[derive(Clone, Debug)]
pub struct AgentState {
    pub position:       Vec2,
    /// Facing, radians, `atan2(x, z)` convention.  Cosmetic only.
    pub rotation:       f32,
    pub waypoint_index: usize,

    pub operation:          Operation,
    pub operation_elapsed:  f32,
    pub operation_duration: f32,
    pub carrying_cargo:     bool,
    pub lift_height:        f32,

    /// Unit travel direction computed this tick; `None` when not travelling.
    pub direction:          Option<Vec2>,
    /// Last travelling direction, kept across operations for reverse detection.
    pub previous_direction: Option<Vec2>,
    pub reversing:          bool,

    /// Undebounced policy verdict for this tick.
    pub raw_blocked:  bool,
    pub block_reason: Option<BlockReason>,
    pub gate:         HysteresisGate,

    pub crossing_approach_timer: f32,
    /// Zone the agent's position is inside, for entered/exited events.
    pub occupied_zone:           Option<String>,

    obstruction:   Throttled<Option<BlockReason>>,
    cargo_flipped: bool,
}

impl AgentState {
    #[inline]
    pub fn published_stopped(&self) -> bool {
        self.gate.published_stopped()
    }

    /// Reset everything that only has meaning while travelling.
    fn idle(&mut self) {
        self.direction               = None;
        self.raw_blocked             = false;
        self.block_reason            = None;
        self.crossing_approach_timer = 0.0;
    }
}

/// Read-only per-agent view for observers and queries.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id:                EntityId,
    pub kind:              EntityKind,
    pub position:          Vec2,
    pub rotation:          f32,
    pub published_stopped: bool,
    pub raw_blocked:       bool,
    pub block_reason:      Option<BlockReason>,
    pub carrying_cargo:    bool,
    pub operation:         Operation,
    pub lift_height:       f32,
    pub waypoint_index:    usize,
    pub reversing:         bool,
}

// ── StepContext ───────────────────────────────────────────────────────────────

/// What a controller may read during one tick.
pub struct StepContext<'a> {
    pub registry: &'a Registry,
    pub zones:    &'a CrossingLayout,
    pub config:   &'a CoordinationConfig,
    pub tick:     Tick,
    /// Clamped delta time, seconds.
    pub delta:    f32,
}

// ── MovementController ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct MovementController {
    id:         EntityId,
    kind:       EntityKind,
    path:       PatrolPath,
    base_speed: f32,
    state:      AgentState,
}

impl MovementController {
    /// Build a controller from `spec`.
    ///
    /// `phase` offsets this controller's throttled obstruction scan so that
    /// agents spawned in sequence do not all scan on the same tick.  Callers
    /// pass the spawn ordinal.
    pub fn new(spec: AgentSpec, config: &CoordinationConfig, phase: u64) -> MotionResult<Self> {
        let AgentSpec { id, kind, path, base_speed, carrying_cargo, start } = spec;
        if !base_speed.is_finite() || base_speed <= 0.0 {
            return Err(MotionError::InvalidSpeed { agent: id, speed: base_speed });
        }

        let first    = path.waypoint(0);
        let position = start.unwrap_or(first);
        let rotation = (first - position).normalized().map_or(0.0, Vec2::heading);
        let throttle = Throttle::new(config.collision_check_interval);

        let state = AgentState {
            position,
            rotation,
            waypoint_index:          0,
            operation:               Operation::Traveling,
            operation_elapsed:       0.0,
            operation_duration:      0.0,
            carrying_cargo,
            lift_height:             0.0,
            direction:               None,
            previous_direction:      None,
            reversing:               false,
            raw_blocked:             false,
            block_reason:            None,
            gate:                    HysteresisGate::new(config.hysteresis_dwell_secs),
            crossing_approach_timer: 0.0,
            occupied_zone:           None,
            obstruction:             Throttled::new(throttle, phase),
            cargo_flipped:           false,
        };

        Ok(Self { id, kind, path, base_speed, state })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn path(&self) -> &PatrolPath {
        &self.path
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// The entry this agent currently owns in the registry.
    pub fn registry_entry(&self) -> EntityPosition {
        EntityPosition {
            id:          self.id.clone(),
            pos:         self.state.position,
            kind:        self.kind,
            direction:   self.state.direction,
            raw_blocked: Some(self.state.raw_blocked),
        }
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        let s = &self.state;
        AgentSnapshot {
            id:                self.id.clone(),
            kind:              self.kind,
            position:          s.position,
            rotation:          s.rotation,
            published_stopped: s.published_stopped(),
            raw_blocked:       s.raw_blocked,
            block_reason:      s.block_reason,
            carrying_cargo:    s.carrying_cargo,
            operation:         s.operation,
            lift_height:       s.lift_height,
            waypoint_index:    s.waypoint_index,
            reversing:         s.reversing,
        }
    }

    /// Advance this agent by one tick.
    ///
    /// Appends anything observable to `events` and returns the registry
    /// entry to write in the apply phase.
    pub fn step(&mut self, ctx: &StepContext<'_>, events: &mut Vec<AgentEvent>) -> EntityPosition {
        self.state.reversing = false;

        match self.state.operation {
            Operation::Traveling                     => self.travel(ctx, events),
            Operation::Loading | Operation::Unloading => self.operate(ctx, events),
        }

        self.track_zone(ctx.zones, events);

        if let Some(t) = self.state.gate.update(self.state.raw_blocked, ctx.delta) {
            let stopped = t == StopTransition::Stopped;
            debug!(agent = %self.id, tick = %ctx.tick, stopped, reason = ?self.state.block_reason, "published stop state changed");
            events.push(AgentEvent::StoppedChanged { stopped });
        }

        self.registry_entry()
    }

    // ── Phases ────────────────────────────────────────────────────────────

    fn travel(&mut self, ctx: &StepContext<'_>, events: &mut Vec<AgentEvent>) {
        let cfg    = ctx.config;
        let target = self.path.waypoint(self.state.waypoint_index);
        let offset = target - self.state.position;
        let dist   = offset.length();

        if dist < cfg.arrival_threshold {
            self.arrive(ctx, events);
            return;
        }

        let dir = Vec2::new(offset.x / dist, offset.z / dist);
        let s   = &mut self.state;

        if let Some(prev) = s.previous_direction {
            if dir.dot(prev) < cfg.reverse_dot_threshold {
                s.reversing = true;
                events.push(AgentEvent::Reversing);
            }
        }
        s.previous_direction = Some(dir);
        s.direction          = Some(dir);

        let (block, speed_factor) = match self.kind {
            // Workers walk their routes and are not held by the policy.
            EntityKind::Worker => (None, 1.0),
            EntityKind::Forklift => {
                let crossing = assess_crossing(
                    ctx.zones,
                    s.position,
                    dir,
                    &mut s.crossing_approach_timer,
                    ctx.delta,
                    cfg,
                );
                let policy = CollisionPolicy::new(ctx.registry, cfg);
                let (id, pos) = (&self.id, s.position);
                let obstruction = *s
                    .obstruction
                    .get_or_refresh(ctx.tick, || policy.obstruction(id.as_str(), pos, dir));
                (CollisionPolicy::decide(obstruction, &crossing), crossing.speed_factor)
            }
        };

        if block != s.block_reason {
            debug!(agent = %self.id, tick = %ctx.tick, from = ?s.block_reason, to = ?block, "block reason changed");
        }
        s.block_reason = block;
        s.raw_blocked  = block.is_some();
        if s.raw_blocked {
            return;
        }

        let step = (self.base_speed * speed_factor * ctx.delta).min(dist);
        if step > 0.0 {
            s.position += dir * step;
            s.rotation  = turn_towards(s.rotation, dir.heading(), cfg.turn_rate * ctx.delta);
        }
    }

    fn arrive(&mut self, ctx: &StepContext<'_>, events: &mut Vec<AgentEvent>) {
        let s      = &mut self.state;
        let index  = s.waypoint_index;
        let action = self.path.action(index);

        let operation = match action.kind {
            ActionKind::Pickup  if !s.carrying_cargo => Some(Operation::Loading),
            ActionKind::Dropoff if s.carrying_cargo  => Some(Operation::Unloading),
            _ => None,
        };

        let next = self.path.next_index(index);
        // A one-waypoint loop with nothing to do is parked, not arriving.
        if operation.is_none() && next == index {
            s.idle();
            return;
        }
        events.push(AgentEvent::WaypointReached { index });

        // The cached verdict was taken for the old heading.
        s.obstruction.invalidate();

        // Passing a waypoint keeps the approach timer running; the new leg
        // is evaluated from the next tick.
        match operation {
            Some(op) => {
                s.idle();
                s.operation          = op;
                s.operation_elapsed  = 0.0;
                s.operation_duration = action.duration_secs;
                s.cargo_flipped      = false;
                debug!(agent = %self.id, tick = %ctx.tick, waypoint = index, operation = %op, "operation started");
                events.push(AgentEvent::OperationStarted { operation: op });
            }
            None => s.waypoint_index = next,
        }
    }

    fn operate(&mut self, ctx: &StepContext<'_>, events: &mut Vec<AgentEvent>) {
        let max_lift = ctx.config.lift_max_height;
        let s        = &mut self.state;
        s.idle();

        s.operation_elapsed += ctx.delta;
        let progress = if s.operation_duration > 0.0 {
            (s.operation_elapsed / s.operation_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        s.lift_height = lift_profile(progress, max_lift);

        if progress >= 0.5 && !s.cargo_flipped {
            s.carrying_cargo = s.operation == Operation::Loading;
            s.cargo_flipped  = true;
        }

        if progress >= 1.0 {
            let op = s.operation;
            s.operation          = Operation::Traveling;
            s.operation_elapsed  = 0.0;
            s.operation_duration = 0.0;
            s.lift_height        = 0.0;
            s.waypoint_index     = self.path.next_index(s.waypoint_index);
            debug!(agent = %self.id, tick = %ctx.tick, operation = %op, cargo = s.carrying_cargo, "operation completed");
            events.push(AgentEvent::OperationCompleted { operation: op });
        }
    }

    fn track_zone(&mut self, zones: &CrossingLayout, events: &mut Vec<AgentEvent>) {
        let now = zones.classify(self.state.position).map(|z| z.id());
        if now == self.state.occupied_zone.as_deref() {
            return;
        }
        if let Some(old) = self.state.occupied_zone.take() {
            events.push(AgentEvent::CrossingExited { zone: old });
        }
        if let Some(new) = now {
            events.push(AgentEvent::CrossingEntered { zone: new.to_owned() });
            self.state.occupied_zone = Some(new.to_owned());
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Lift height for an operation at `progress` ∈ [0, 1]: up over the first
/// half, down over the second.
pub fn lift_profile(progress: f32, max_height: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        max_height * p * 2.0
    } else {
        max_height * (1.0 - p) * 2.0
    }
}

/// Move `current` towards `target` (radians) by fraction `t` of the shortest
/// angular difference.
fn turn_towards(current: f32, target: f32, t: f32) -> f32 {
    let diff = (target - current + PI).rem_euclid(TAU) - PI;
    current + diff * t.clamp(0.0, 1.0)
}
