//! Floor observer trait for progress reporting and data collection.

use fc_core::Tick;
use fc_motion::AgentSnapshot;

use crate::{FloorEvent, TickReport};

/// Callbacks invoked by [`Floor::simulate_with`][crate::Floor::simulate_with]
/// at key points in the tick.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — horn cue
///
/// ```rust,ignore
/// struct Horn;
///
/// impl FloorObserver for Horn {
///     fn on_event(&mut self, ev: &FloorEvent) {
///         if ev.event == AgentEvent::StoppedChanged { stopped: true } {
///             play_horn(&ev.agent);
///         }
///     }
/// }
/// ```
pub trait FloorObserver {
    /// Called at the start of each tick with the clamped delta.
    fn on_tick_start(&mut self, _tick: Tick, _delta: f32) {}

    /// Called once per agent event, after the apply phase, in agent id order.
    fn on_event(&mut self, _event: &FloorEvent) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`).
    /// `agents` is in ascending id order.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[AgentSnapshot]) {}

    /// Called once by [`Floor::finish`][crate::Floor::finish].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`FloorObserver`] that does nothing.
pub struct NoopObserver;

impl FloorObserver for NoopObserver {}
