//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `events.csv`
//! - `tick_summaries.csv`
//!
//! Booleans are written as `0`/`1`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, EventRow, OutputResult, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 13] = [
    "agent_id",
    "kind",
    "tick",
    "x",
    "z",
    "rotation",
    "operation",
    "waypoint_index",
    "carrying_cargo",
    "lift_height",
    "raw_blocked",
    "published_stopped",
    "block_reason",
];

pub const EVENT_HEADER: [&str; 4] = ["tick", "agent_id", "event", "detail"];

pub const SUMMARY_HEADER: [&str; 6] = ["tick", "delta_secs", "moving", "blocked", "stopped", "events"];

/// Writes floor traces to three CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    events:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create (truncating) the three CSV files in `dir` and write the header
    /// rows.  `dir` must already exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(EVENT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, events, summaries, finished: false })
    }
}

fn flag(b: bool) -> String {
    (b as u8).to_string()
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.clone(),
                row.kind.to_owned(),
                row.tick.to_string(),
                row.x.to_string(),
                row.z.to_string(),
                row.rotation.to_string(),
                row.operation.to_owned(),
                row.waypoint_index.to_string(),
                flag(row.carrying_cargo),
                row.lift_height.to_string(),
                flag(row.raw_blocked),
                flag(row.published_stopped),
                row.block_reason.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.agent_id.clone(),
                row.event.to_owned(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.delta_secs.to_string(),
            row.moving.to_string(),
            row.blocked.to_string(),
            row.stopped.to_string(),
            row.events.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
