//! `FloorOutputObserver<W>`: bridges `FloorObserver` to an `OutputWriter`.

use fc_core::Tick;
use fc_motion::AgentSnapshot;
use fc_sim::{FloorObserver, TickReport};

use crate::row::{AgentSnapshotRow, EventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`FloorObserver`] that writes snapshots, events and tick summaries to
/// any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `FloorObserver`
/// methods have no return value.  After the run, check for errors with
/// [`take_error`][Self::take_error].
pub struct FloorOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> FloorOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any).  `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> FloorObserver for FloorOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        if !report.events.is_empty() {
            let rows: Vec<EventRow> = report.events.iter().map(EventRow::from).collect();
            let result = self.writer.write_events(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(report));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[AgentSnapshot]) {
        if agents.is_empty() {
            return;
        }
        let rows: Vec<AgentSnapshotRow> = agents
            .iter()
            .map(|s| AgentSnapshotRow::from_snapshot(tick, s))
            .collect();
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
