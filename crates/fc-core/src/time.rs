//! Simulation time model.
//!
//! # Design
//!
//! The engine advances one discrete step per rendered frame.  Two quantities
//! are tracked:
//!
//! - a monotonically increasing `Tick` counter, the canonical "which step is
//!   this" index used by the throttler and by event records;
//! - the accumulated simulated seconds, the sum of every *clamped* delta.
//!
//! Frame deltas arrive from an external scheduler and may be arbitrarily
//! large after a paused or backgrounded render loop resumes.  `FrameClock`
//! clamps every delta to `max_delta_secs` before anything integrates it.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── FrameClock ────────────────────────────────────────────────────────────────

/// Tracks the current tick and total simulated time, clamping frame deltas.
#[derive(Clone, Debug)]
pub struct FrameClock {
    /// The tick that the *next* call to [`advance`](Self::advance) starts.
    pub current_tick: Tick,
    /// Sum of all clamped deltas, seconds.
    pub elapsed_secs: f64,
    /// Upper bound applied to every delta, seconds.
    pub max_delta_secs: f32,
}

impl FrameClock {
    pub fn new(max_delta_secs: f32) -> Self {
        Self {
            current_tick:   Tick::ZERO,
            elapsed_secs:   0.0,
            max_delta_secs,
        }
    }

    /// Clamp a raw frame delta into `[0, max_delta_secs]`.
    ///
    /// NaN and negative deltas become `0.0`.
    #[inline]
    pub fn clamp_delta(&self, raw: f32) -> f32 {
        if raw.is_nan() || raw <= 0.0 {
            0.0
        } else {
            raw.min(self.max_delta_secs)
        }
    }

    /// Start a new step with frame delta `raw`.
    ///
    /// Returns the tick being simulated and the clamped delta to integrate.
    pub fn advance(&mut self, raw: f32) -> (Tick, f32) {
        let delta = self.clamp_delta(raw);
        let tick = self.current_tick;
        self.current_tick = tick + 1;
        self.elapsed_secs += delta as f64;
        (tick, delta)
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs)
    }
}
