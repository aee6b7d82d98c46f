//! `fc-output` — trace writers for the floor coordination engine.
//!
//! | Backend | Files created                                              |
//! |---------|------------------------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `events.csv`, `tick_summaries.csv`  |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`FloorOutputObserver`], which implements `fc_sim::FloorObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fc_output::{CsvWriter, FloorOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = FloorOutputObserver::new(writer);
//! floor.run_ticks(3_600, 1.0 / 60.0, &mut obs);
//! floor.finish(&mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::FloorOutputObserver;
pub use row::{AgentSnapshotRow, EventRow, TickSummaryRow};
pub use writer::OutputWriter;
