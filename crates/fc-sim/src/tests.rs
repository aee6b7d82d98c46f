//! Integration tests for fc-sim.

use fc_core::{CoordinationConfig, EntityKind, Tick, Vec2};
use fc_motion::{AgentEvent, AgentSnapshot, AgentSpec, BlockReason, MotionError, PatrolPath};
use fc_spatial::{CrossingZone, EntityPosition, SpatialError, ZoneKind};

use crate::{Floor, FloorBuilder, FloorEvent, FloorObserver, NoopObserver, SimError, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 1/16 s: exact in `f32`, so the 0.15 s dwell lands on the 3rd tick.
const DT: f32 = 0.0625;

fn v(x: f32, z: f32) -> Vec2 {
    Vec2::new(x, z)
}

fn lane(from: Vec2, to: Vec2) -> PatrolPath {
    PatrolPath::patrol(vec![to, from]).unwrap()
}

/// Forklift starting at `from`, driving towards `to`.
fn forklift(id: &str, from: Vec2, to: Vec2) -> AgentSpec {
    AgentSpec::forklift(id, lane(from, to), 2.0).starting_at(from)
}

fn empty_floor() -> Floor {
    FloorBuilder::new(CoordinationConfig::default()).build().unwrap()
}

fn assert_registry_matches_controllers(floor: &Floor) {
    for id in floor.agent_ids() {
        let ctl = floor.agent(id.as_str()).unwrap();
        assert_eq!(floor.registry().get(id.as_str()), Some(&ctl.registry_entry()));
    }
}

// ── FloorBuilder validation ───────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_and_registers_agents() {
        let floor = FloorBuilder::new(CoordinationConfig::default())
            .agent(forklift("fk-1", v(0.0, 0.0), v(10.0, 0.0)))
            .agent(AgentSpec::worker("w-1", lane(v(0.0, 8.0), v(10.0, 8.0)), 1.4))
            .build()
            .unwrap();
        assert_eq!(floor.agent_count(), 2);
        assert_eq!(floor.registry().len(), 2);
        assert_eq!(floor.registry().get("fk-1").unwrap().pos, v(0.0, 0.0));
        assert_eq!(floor.now(), Tick::ZERO);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = CoordinationConfig { arrival_threshold: 0.0, ..CoordinationConfig::default() };
        assert!(matches!(FloorBuilder::new(config).build(), Err(SimError::Core(_))));
    }

    #[test]
    fn duplicate_zone_rejected() {
        let z = CrossingZone::new("belt", 0.0, 1.0, 0.0, 1.0, ZoneKind::Conveyor).unwrap();
        let result = FloorBuilder::new(CoordinationConfig::default())
            .zones(vec![z.clone(), z])
            .build();
        assert!(matches!(result, Err(SimError::Spatial(SpatialError::DuplicateZone(_)))));
    }

    #[test]
    fn duplicate_agent_rejected() {
        let result = FloorBuilder::new(CoordinationConfig::default())
            .agent(forklift("fk", v(0.0, 0.0), v(10.0, 0.0)))
            .agent(forklift("fk", v(0.0, 5.0), v(10.0, 5.0)))
            .build();
        assert!(matches!(result, Err(SimError::DuplicateAgent(_))));
    }

    #[test]
    fn bad_speed_surfaces_as_motion_error() {
        let mut floor = empty_floor();
        let spec = AgentSpec::worker("w", lane(v(0.0, 0.0), v(1.0, 0.0)), -1.0);
        assert!(matches!(
            floor.spawn(spec),
            Err(SimError::Motion(MotionError::InvalidSpeed { .. }))
        ));
        assert!(floor.registry().is_empty());
    }
}

// ── Population management ─────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use super::*;

    #[test]
    fn despawn_unregisters_in_same_call() {
        let mut floor = empty_floor();
        floor.spawn(forklift("fk", v(0.0, 0.0), v(10.0, 0.0))).unwrap();
        floor.simulate(DT);

        assert!(floor.despawn("fk"));
        assert!(floor.registry().get("fk").is_none());
        assert!(floor.snapshot("fk").is_none());
        assert!(!floor.despawn("fk"));
    }

    #[test]
    fn external_entries_survive_ticks_untouched() {
        let mut floor = empty_floor();
        let w = EntityPosition::new("scanner-7", v(30.0, 30.0), EntityKind::Worker);
        floor.place_external(w.clone()).unwrap();
        floor.spawn(forklift("fk", v(0.0, 0.0), v(10.0, 0.0))).unwrap();

        floor.run_ticks(20, DT, &mut NoopObserver);
        assert_eq!(floor.registry().get("scanner-7"), Some(&w));
        assert!(floor.is_external("scanner-7"));

        assert!(floor.remove_external("scanner-7"));
        assert!(floor.registry().get("scanner-7").is_none());
        assert!(!floor.remove_external("scanner-7"));
    }

    #[test]
    fn external_placement_cannot_hijack_an_agent() {
        let mut floor = empty_floor();
        floor.spawn(forklift("fk", v(0.0, 0.0), v(10.0, 0.0))).unwrap();

        let fake = EntityPosition::new("fk", v(50.0, 50.0), EntityKind::Forklift);
        assert!(matches!(floor.place_external(fake), Err(SimError::OwnedByController(_))));
        assert!(!floor.remove_external("fk"));
        assert_eq!(floor.registry().get("fk").unwrap().pos, v(0.0, 0.0));
    }

    #[test]
    fn spawn_rejects_external_id() {
        let mut floor = empty_floor();
        floor
            .place_external(EntityPosition::new("w", v(0.0, 0.0), EntityKind::Worker))
            .unwrap();
        let spec = AgentSpec::worker("w", lane(v(0.0, 0.0), v(1.0, 0.0)), 1.0);
        assert!(matches!(floor.spawn(spec), Err(SimError::OwnedExternally(_))));
    }

    #[test]
    fn non_finite_external_rejected() {
        let mut floor = empty_floor();
        let e = EntityPosition::new("w", v(f32::NAN, 0.0), EntityKind::Worker);
        assert!(matches!(floor.place_external(e), Err(SimError::NonFinitePosition(_))));
        assert!(floor.registry().is_empty());
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_loop {
    use super::*;

    #[test]
    fn delta_is_clamped() {
        let mut floor = empty_floor();
        floor.spawn(AgentSpec::worker("w", lane(v(0.0, 0.0), v(100.0, 0.0)), 1.0).starting_at(v(0.0, 0.0))).unwrap();

        assert_eq!(floor.simulate(5.0).delta, 0.1);
        assert_eq!(floor.simulate(f32::NAN).delta, 0.0);
        assert_eq!(floor.simulate(-1.0).delta, 0.0);
        assert_eq!(floor.now(), Tick(3));
        // Only the clamped 0.1 s was integrated.
        assert!((floor.snapshot("w").unwrap().position.x - 0.1).abs() < 1e-6);
        assert!((floor.clock().elapsed_secs - 0.1).abs() < 1e-6);
    }

    #[test]
    fn registry_always_matches_controllers() {
        let mut floor = FloorBuilder::new(CoordinationConfig::default())
            .agent(forklift("fk-a", v(0.0, 0.0), v(20.0, 0.0)))
            .agent(forklift("fk-b", v(0.0, 10.0), v(20.0, 10.0)))
            .agent(AgentSpec::worker("w", lane(v(10.0, -10.0), v(10.0, 20.0)), 1.5).starting_at(v(10.0, -10.0)))
            .build()
            .unwrap();

        for _ in 0..200 {
            floor.simulate(DT);
            assert_eq!(floor.registry().len(), 3);
            assert_registry_matches_controllers(&floor);
        }
    }

    #[test]
    fn reads_see_previous_tick_only() {
        // "a" steps before "fk" in id order.  It starts 7.4 ahead of the
        // forklift (inside the lane check) and walks out of it on tick 0.
        let mut floor = FloorBuilder::new(CoordinationConfig::default())
            .agent(AgentSpec::worker("a", lane(v(7.4, 0.0), v(40.0, 0.0)), 4.0).starting_at(v(7.4, 0.0)))
            .agent(forklift("fk", v(0.0, 0.0), v(20.0, 0.0)))
            .build()
            .unwrap();

        floor.simulate(DT);
        let fk = floor.snapshot("fk").unwrap();
        assert!(fk.raw_blocked, "fk must judge by the worker's pre-tick position");
        assert_eq!(fk.block_reason, Some(BlockReason::PathObstructed));
        assert_eq!(fk.position, v(0.0, 0.0));

        floor.simulate(DT);
        let fk = floor.snapshot("fk").unwrap();
        assert!(!fk.raw_blocked);
        assert_eq!(fk.position, v(0.125, 0.0));
    }

    #[test]
    fn throttled_scan_reuses_verdict() {
        let config = CoordinationConfig { collision_check_interval: 4, ..CoordinationConfig::default() };
        let mut floor = FloorBuilder::new(config)
            .agent(forklift("fk", v(0.0, 0.0), v(20.0, 0.0)))
            .build()
            .unwrap();
        floor
            .place_external(EntityPosition::new("w", v(4.0, 0.0), EntityKind::Worker))
            .unwrap();

        floor.simulate(DT); // T0: scan runs
        assert!(floor.snapshot("fk").unwrap().raw_blocked);

        floor.remove_external("w");
        for _ in 1..4 {
            floor.simulate(DT); // T1..T3: cached verdict
            assert!(floor.snapshot("fk").unwrap().raw_blocked);
        }
        floor.simulate(DT); // T4: scan runs again
        assert!(!floor.snapshot("fk").unwrap().raw_blocked);
    }

    #[test]
    fn report_counts() {
        let mut floor = FloorBuilder::new(CoordinationConfig::default())
            .agent(forklift("fk", v(0.0, 0.0), v(20.0, 0.0)))
            .agent(AgentSpec::worker("w", lane(v(4.0, 0.0), v(4.0, 30.0)), 1.0).starting_at(v(4.0, 0.0)))
            .build()
            .unwrap();

        let r = floor.simulate(DT);
        assert_eq!(r.tick, Tick(0));
        assert_eq!(r.blocked, 1);
        assert_eq!(r.moving, 1);
        assert_eq!(r.stopped, 0);

        floor.simulate(DT);
        let r = floor.simulate(DT);
        assert_eq!(r.stopped, 1);
        assert!(r.events.iter().any(|e| {
            e.agent.as_str() == "fk" && e.event == AgentEvent::StoppedChanged { stopped: true }
        }));
    }
}

// ── Head-on forklifts ─────────────────────────────────────────────────────────

#[cfg(test)]
mod head_on {
    use super::*;

    fn facing_pair() -> Floor {
        FloorBuilder::new(CoordinationConfig::default())
            .agent(forklift("fk-east", v(0.0, 0.0), v(20.0, 0.0)))
            .agent(forklift("fk-west", v(3.0, 0.0), v(-20.0, 0.0)))
            .build()
            .unwrap()
    }

    #[test]
    fn mutual_block_is_stable() {
        let mut floor = facing_pair();
        for _ in 0..500 {
            floor.simulate(DT);
        }
        for id in ["fk-east", "fk-west"] {
            let s = floor.snapshot(id).unwrap();
            assert!(s.raw_blocked, "{id} moved");
            assert!(s.published_stopped);
        }
        assert_eq!(floor.snapshot("fk-east").unwrap().position, v(0.0, 0.0));
        assert_eq!(floor.snapshot("fk-west").unwrap().position, v(3.0, 0.0));
    }

    #[test]
    fn withdrawal_unblocks_raw_at_once_and_published_after_dwell() {
        let mut floor = facing_pair();
        floor.run_ticks(10, DT, &mut NoopObserver);
        assert!(floor.snapshot("fk-east").unwrap().published_stopped);

        assert!(floor.despawn("fk-west"));

        let r = floor.simulate(DT);
        let s = floor.snapshot("fk-east").unwrap();
        assert!(!s.raw_blocked);
        assert!(s.published_stopped);
        assert_eq!(s.position, v(0.125, 0.0));
        assert!(r.events.is_empty());

        floor.simulate(DT);
        assert!(floor.snapshot("fk-east").unwrap().published_stopped);

        // 3 × 0.0625 = 0.1875 s ≥ 0.15 s.
        let r = floor.simulate(DT);
        assert!(!floor.snapshot("fk-east").unwrap().published_stopped);
        assert_eq!(
            r.events,
            vec![FloorEvent {
                tick:  r.tick,
                agent: "fk-east".into(),
                event: AgentEvent::StoppedChanged { stopped: false },
            }]
        );
    }

    #[test]
    fn external_forklift_moving_away_releases() {
        let mut floor = FloorBuilder::new(CoordinationConfig::default())
            .agent(forklift("fk", v(0.0, 0.0), v(20.0, 0.0)))
            .build()
            .unwrap();
        let other = EntityPosition::new("visitor", v(3.0, 0.0), EntityKind::Forklift)
            .with_direction(v(-1.0, 0.0));
        floor.place_external(other).unwrap();

        floor.run_ticks(5, DT, &mut NoopObserver);
        assert!(floor.snapshot("fk").unwrap().raw_blocked);

        // 5.4 from us: outside the 4.0 forklift radius and 4.5 off the lane.
        let other = EntityPosition::new("visitor", v(3.0, 4.5), EntityKind::Forklift)
            .with_direction(v(0.0, 1.0));
        floor.place_external(other).unwrap();
        floor.simulate(DT);
        assert!(!floor.snapshot("fk").unwrap().raw_blocked);
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts:    Vec<(Tick, f32)>,
        ends:      Vec<Tick>,
        events:    Vec<FloorEvent>,
        snapshots: Vec<(Tick, Vec<AgentSnapshot>)>,
        finished:  Option<Tick>,
    }

    impl FloorObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick, delta: f32) {
            self.starts.push((tick, delta));
        }
        fn on_event(&mut self, event: &FloorEvent) {
            self.events.push(event.clone());
        }
        fn on_tick_end(&mut self, report: &TickReport) {
            self.ends.push(report.tick);
        }
        fn on_snapshot(&mut self, tick: Tick, agents: &[AgentSnapshot]) {
            self.snapshots.push((tick, agents.to_vec()));
        }
        fn on_sim_end(&mut self, final_tick: Tick) {
            self.finished = Some(final_tick);
        }
    }

    #[test]
    fn hooks_fire_in_order() {
        let config = CoordinationConfig { snapshot_interval_ticks: 4, ..CoordinationConfig::default() };
        let mut floor = FloorBuilder::new(config)
            .agent(AgentSpec::worker("w-2", lane(v(0.0, 5.0), v(9.0, 5.0)), 1.0))
            .agent(AgentSpec::worker("w-1", lane(v(0.0, 0.0), v(9.0, 0.0)), 1.0))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        floor.run_ticks(10, DT, &mut rec);
        floor.finish(&mut rec);

        assert_eq!(rec.starts.len(), 10);
        assert_eq!(rec.starts[0], (Tick(0), DT));
        assert_eq!(rec.ends.last(), Some(&Tick(9)));
        assert_eq!(rec.finished, Some(Tick(10)));

        let snap_ticks: Vec<Tick> = rec.snapshots.iter().map(|(t, _)| *t).collect();
        assert_eq!(snap_ticks, vec![Tick(0), Tick(4), Tick(8)]);
        let ids: Vec<&str> = rec.snapshots[0].1.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["w-1", "w-2"]);

        // Both workers spawn on waypoint 0, so tick 0 is an arrival for
        // each; events come out in id order.
        assert_eq!(rec.events[0].agent.as_str(), "w-1");
        assert_eq!(rec.events[1].agent.as_str(), "w-2");
        assert!(rec.events.iter().take(2).all(|e| e.event == AgentEvent::WaypointReached { index: 0 }));
    }

    #[test]
    fn zero_snapshot_interval_disables_snapshots() {
        let config = CoordinationConfig { snapshot_interval_ticks: 0, ..CoordinationConfig::default() };
        let mut floor = FloorBuilder::new(config)
            .agent(AgentSpec::worker("w-1", lane(v(0.0, 0.0), v(9.0, 0.0)), 1.0))
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        floor.run_ticks(10, DT, &mut rec);

        assert_eq!(rec.ends.len(), 10);
        assert!(rec.snapshots.is_empty());
    }
}
