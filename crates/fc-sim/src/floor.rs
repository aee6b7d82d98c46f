//! The `Floor` struct and its tick loop.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use fc_core::{CoordinationConfig, EntityId, FrameClock, Throttle, Tick};
use fc_motion::{AgentEvent, AgentSnapshot, AgentSpec, MovementController, Operation, StepContext};
use fc_spatial::{CrossingLayout, EntityPosition, Registry};

use crate::{FloorObserver, NoopObserver, SimError, SimResult};

// ── Tick output ───────────────────────────────────────────────────────────────

/// An [`AgentEvent`] tagged with who and when.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorEvent {
    pub tick:  Tick,
    pub agent: EntityId,
    pub event: AgentEvent,
}

/// Summary of one [`Floor::simulate`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick:    Tick,
    /// Delta actually integrated, after clamping.
    pub delta:   f32,
    /// Travelling agents that were not blocked this tick.
    pub moving:  usize,
    /// Agents whose raw blocked flag is set.
    pub blocked: usize,
    /// Agents whose published stopped state is set.
    pub stopped: usize,
    pub events:  Vec<FloorEvent>,
}

// ── Floor ─────────────────────────────────────────────────────────────────────

/// One warehouse floor: the registry, the static crossing layout, and every
/// controller-driven agent.
///
/// `Floor` drives the two-phase tick:
///
/// 1. **Read phase**: each controller, in ascending id order, steps against
///    the registry as it stood at the end of the previous tick.  Nothing is
///    written.
/// 2. **Apply phase**: each controller's returned entry overwrites its own
///    registry slot.
///
/// No agent ever observes a partially updated tick, so results do not depend
/// on iteration order.
///
/// Create via [`FloorBuilder`][crate::FloorBuilder].
pub struct Floor {
    pub(crate) config:            CoordinationConfig,
    pub(crate) clock:             FrameClock,
    pub(crate) registry:          Registry,
    pub(crate) zones:             CrossingLayout,
    pub(crate) agents:            BTreeMap<EntityId, MovementController>,
    /// Registry ids owned by collaborators outside the floor.
    pub(crate) external:          BTreeSet<EntityId>,
    /// Spawn ordinal of the next agent; the phase of its throttled scan.
    pub(crate) next_ordinal:      u64,
    pub(crate) snapshot_throttle: Throttle,
}

impl Floor {
    pub(crate) fn new(config: CoordinationConfig, zones: CrossingLayout) -> Self {
        Self {
            clock:             FrameClock::new(config.max_delta_secs),
            snapshot_throttle: Throttle::new(config.snapshot_interval_ticks),
            config,
            registry:          Registry::new(),
            zones,
            agents:            BTreeMap::new(),
            external:          BTreeSet::new(),
            next_ordinal:      0,
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Add a controller-driven agent and register it immediately.
    pub fn spawn(&mut self, spec: AgentSpec) -> SimResult<()> {
        if self.agents.contains_key(&spec.id) {
            return Err(SimError::DuplicateAgent(spec.id));
        }
        if self.external.contains(&spec.id) {
            return Err(SimError::OwnedExternally(spec.id));
        }

        let ctl = MovementController::new(spec, &self.config, self.next_ordinal)?;
        self.next_ordinal += 1;

        let entry = ctl.registry_entry();
        info!(
            agent     = %ctl.id(),
            kind      = %ctl.kind(),
            waypoints = ctl.path().len(),
            speed     = ctl.base_speed(),
            "agent spawned"
        );
        self.registry.register(entry);
        self.agents.insert(ctl.id().clone(), ctl);
        Ok(())
    }

    /// Remove an agent and its registry entry in the same call.
    ///
    /// Returns `false` if no agent has that id.
    pub fn despawn(&mut self, id: &str) -> bool {
        if self.agents.remove(id).is_none() {
            return false;
        }
        self.registry.unregister(id);
        info!(agent = id, "agent despawned");
        true
    }

    /// Write a registry entry on behalf of an outside collaborator (e.g. a
    /// worker tracked by another system).  Overwrites the collaborator's
    /// previous entry for the same id.
    pub fn place_external(&mut self, entry: EntityPosition) -> SimResult<()> {
        if self.agents.contains_key(&entry.id) {
            return Err(SimError::OwnedByController(entry.id));
        }
        if !entry.pos.is_finite() {
            return Err(SimError::NonFinitePosition(entry.id));
        }
        if self.external.insert(entry.id.clone()) {
            debug!(entity = %entry.id, kind = %entry.kind, "external entity placed");
        }
        self.registry.register(entry);
        Ok(())
    }

    /// Remove an externally owned entry.  Returns `false` for ids that are
    /// unknown or belong to a controller.
    pub fn remove_external(&mut self, id: &str) -> bool {
        if !self.external.remove(id) {
            warn!(entity = id, "remove_external on an id that is not externally owned");
            return false;
        }
        self.registry.unregister(id);
        debug!(entity = id, "external entity removed");
        true
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance one tick with frame delta `raw_delta` seconds.
    pub fn simulate(&mut self, raw_delta: f32) -> TickReport {
        self.simulate_with(raw_delta, &mut NoopObserver)
    }

    /// Like [`simulate`](Self::simulate), reporting to `observer`.
    pub fn simulate_with<O: FloorObserver>(&mut self, raw_delta: f32, observer: &mut O) -> TickReport {
        let (tick, delta) = self.clock.advance(raw_delta);
        if raw_delta.is_nan() || raw_delta < 0.0 {
            warn!(%tick, raw_delta, "invalid frame delta treated as zero");
        } else if delta < raw_delta {
            warn!(%tick, raw_delta, delta, "frame delta clamped");
        }
        observer.on_tick_start(tick, delta);

        // ── Phase 1: read ─────────────────────────────────────────────────
        //
        // Every controller sees the registry exactly as the previous tick
        // left it.  Entries to write are collected, not applied.
        let ctx = StepContext {
            registry: &self.registry,
            zones:    &self.zones,
            config:   &self.config,
            tick,
            delta,
        };
        let mut writes  = Vec::with_capacity(self.agents.len());
        let mut events  = Vec::new();
        let mut scratch = Vec::new();
        for (id, ctl) in self.agents.iter_mut() {
            writes.push(ctl.step(&ctx, &mut scratch));
            events.extend(scratch.drain(..).map(|event| FloorEvent { tick, agent: id.clone(), event }));
        }

        // ── Phase 2: apply ────────────────────────────────────────────────
        //
        // Each entry is written by its own controller only.
        for entry in writes {
            self.registry.register(entry);
        }

        // ── Report ────────────────────────────────────────────────────────
        for ev in &events {
            observer.on_event(ev);
        }

        let (mut moving, mut blocked, mut stopped) = (0, 0, 0);
        for ctl in self.agents.values() {
            let s = ctl.state();
            if s.raw_blocked {
                blocked += 1;
            } else if s.operation == Operation::Traveling && s.direction.is_some() {
                moving += 1;
            }
            if s.published_stopped() {
                stopped += 1;
            }
        }

        let report = TickReport { tick, delta, moving, blocked, stopped, events };
        observer.on_tick_end(&report);

        if self.config.snapshot_interval_ticks > 0 && self.snapshot_throttle.should_run(tick, 0) {
            observer.on_snapshot(tick, &self.snapshots());
        }

        report
    }

    /// Run `n` ticks, each with frame delta `raw_delta`.
    pub fn run_ticks<O: FloorObserver>(&mut self, n: u64, raw_delta: f32, observer: &mut O) {
        for _ in 0..n {
            self.simulate_with(raw_delta, observer);
        }
    }

    /// Signal the end of a run to `observer`.
    pub fn finish<O: FloorObserver>(&self, observer: &mut O) {
        observer.on_sim_end(self.clock.current_tick);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn zones(&self) -> &CrossingLayout {
        &self.zones
    }

    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The tick the next `simulate` call will run.
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn agent(&self, id: &str) -> Option<&MovementController> {
        self.agents.get(id)
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Ids of controller-driven agents, ascending.
    pub fn agent_ids(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.agents.keys()
    }

    pub fn is_external(&self, id: &str) -> bool {
        self.external.contains(id)
    }

    pub fn snapshot(&self, id: &str) -> Option<AgentSnapshot> {
        self.agents.get(id).map(MovementController::snapshot)
    }

    /// Snapshots of every agent, ascending id order.
    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents.values().map(MovementController::snapshot).collect()
    }
}
