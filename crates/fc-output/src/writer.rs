//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentSnapshotRow, EventRow, OutputResult, TickSummaryRow};

/// A sink for floor trace data.
///
/// Errors are returned to the caller; [`FloorOutputObserver`][crate::FloorOutputObserver]
/// stores them and hands them out through `take_error`.
pub trait OutputWriter {
    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Write a batch of agent events.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; calling it twice is fine.
    fn finish(&mut self) -> OutputResult<()>;
}
