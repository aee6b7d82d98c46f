//! warehouse — a small floor with a conveyor crossing, one aisle
//! intersection, four forklifts and two pickers.
//!
//! Routes come from the embedded `data/routes.csv`.  Pass a JSON file as the
//! first argument to override any `CoordinationConfig` field, e.g.
//! `cargo run -p warehouse -- demos/warehouse/data/config.json`.
//! Traces are written to `output/warehouse/`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use fc_core::{CoordinationConfig, EntityKind, Tick};
use fc_motion::{AgentEvent, AgentSnapshot, load_routes_reader};
use fc_output::{CsvWriter, FloorOutputObserver, OutputWriter};
use fc_sim::{FloorBuilder, FloorEvent, FloorObserver, TickReport};
use fc_spatial::{CrossingZone, ZoneKind};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:           u64 = 7;
const FRAME_DELTA:    f32 = 1.0 / 60.0;
const SIM_SECONDS:    u64 = 120;
const TICKS:          u64 = SIM_SECONDS * 60;
const FORKLIFT_SPEED: f32 = 2.5;
const WORKER_SPEED:   f32 = 1.4;
const OUT_DIR:        &str = "output/warehouse";

const ROUTES_CSV: &str = include_str!("../data/routes.csv");

// ── Floor layout ──────────────────────────────────────────────────────────────

fn zones() -> Result<Vec<CrossingZone>> {
    Ok(vec![
        // Belt running north-south, crossed by the fk-01 / fk-02 lanes.
        CrossingZone::new("conveyor-a", 14.0, 16.0, -3.0, 9.0, ZoneKind::Conveyor)?,
        // Aisle 3 meets the main lane where w-01 walks across.
        CrossingZone::new("aisle-3", 8.0, 12.0, -2.0, 2.0, ZoneKind::Intersection)?,
    ])
}

fn load_config(path: Option<String>) -> Result<CoordinationConfig> {
    let Some(path) = path else {
        return Ok(CoordinationConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: CoordinationConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    info!(%path, "config override loaded");
    Ok(config)
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ── Observer wrapper for cue counts ───────────────────────────────────────────

/// Counts horn and reverse-beeper cues while forwarding everything to the
/// CSV observer.
struct CueCounter<W: OutputWriter> {
    inner:     FloorOutputObserver<W>,
    horns:     usize,
    beeps:     usize,
    snapshots: usize,
}

impl<W: OutputWriter> CueCounter<W> {
    fn new(inner: FloorOutputObserver<W>) -> Self {
        Self { inner, horns: 0, beeps: 0, snapshots: 0 }
    }
}

impl<W: OutputWriter> FloorObserver for CueCounter<W> {
    fn on_event(&mut self, ev: &FloorEvent) {
        match ev.event {
            AgentEvent::StoppedChanged { stopped: true } => self.horns += 1,
            AgentEvent::Reversing                        => self.beeps += 1,
            _ => {}
        }
    }

    fn on_tick_end(&mut self, report: &TickReport) {
        self.inner.on_tick_end(report);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[AgentSnapshot]) {
        self.snapshots += agents.len();
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();

    let config = load_config(std::env::args().nth(1))?;
    let routes = load_routes_reader(Cursor::new(ROUTES_CSV)).context("loading routes")?;

    // Pickers do not all walk at the same pace.
    let mut rng = SmallRng::seed_from_u64(SEED);
    let specs: Vec<_> = routes
        .into_iter()
        .map(|r| {
            let speed = match r.kind {
                EntityKind::Forklift => FORKLIFT_SPEED,
                EntityKind::Worker   => WORKER_SPEED * rng.gen_range(0.85..1.15),
            };
            r.into_agent(speed)
        })
        .collect();

    let mut floor = FloorBuilder::new(config).zones(zones()?).agents(specs).build()?;

    std::fs::create_dir_all(OUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUT_DIR))?;
    let mut obs = CueCounter::new(FloorOutputObserver::new(writer));

    let t0 = Instant::now();
    floor.run_ticks(TICKS, FRAME_DELTA, &mut obs);
    floor.finish(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Simulated {SIM_SECONDS} s ({TICKS} ticks) in {:.3} s", elapsed.as_secs_f64());
    println!("  horn cues    : {}", obs.horns);
    println!("  reverse beeps: {}", obs.beeps);
    println!("  snapshot rows: {}", obs.snapshots);
    println!();

    println!(
        "{:<8} {:<9} {:>8} {:>8} {:<10} {:<6} {:<8}",
        "Agent", "Kind", "x", "z", "Operation", "Cargo", "Stopped"
    );
    println!("{}", "-".repeat(64));
    for s in floor.snapshots() {
        println!(
            "{:<8} {:<9} {:>8.2} {:>8.2} {:<10} {:<6} {:<8}",
            s.id.as_str(),
            s.kind.as_str(),
            s.position.x,
            s.position.z,
            s.operation.as_str(),
            if s.carrying_cargo { "yes" } else { "no" },
            if s.published_stopped { "yes" } else { "no" },
        );
    }

    Ok(())
}
