//! Tick-rate throttling for expensive per-agent work.
//!
//! A [`Throttle`] answers "should this job run on this tick?".  Jobs carry a
//! `phase` (typically the agent's spawn ordinal) so that N agents throttled
//! to every k-th tick spread their work across the k ticks instead of all
//! firing together.
//!
//! [`Throttled<T>`] pairs a throttle with the last computed value and the
//! tick it was computed on; skipped ticks reuse the cached value.

use crate::Tick;

/// Runs a job on one tick out of every `every`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Throttle {
    every: u32,
}

impl Throttle {
    /// `every <= 1` means "run on every tick".
    pub fn new(every: u32) -> Self {
        Self { every: every.max(1) }
    }

    /// A throttle that never skips.
    pub fn always() -> Self {
        Self { every: 1 }
    }

    #[inline]
    pub fn every(self) -> u32 {
        self.every
    }

    #[inline]
    pub fn should_run(self, tick: Tick, phase: u64) -> bool {
        self.every == 1 || tick.0.wrapping_add(phase) % self.every as u64 == 0
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::always()
    }
}

/// A value recomputed only on ticks its [`Throttle`] allows.
#[derive(Clone, Debug)]
pub struct Throttled<T> {
    throttle:    Throttle,
    phase:       u64,
    value:       Option<T>,
    computed_at: Option<Tick>,
}

impl<T> Throttled<T> {
    pub fn new(throttle: Throttle, phase: u64) -> Self {
        Self { throttle, phase, value: None, computed_at: None }
    }

    /// Return the value for `tick`, calling `compute` if the throttle fires
    /// or nothing has been computed yet.
    pub fn get_or_refresh(&mut self, tick: Tick, compute: impl FnOnce() -> T) -> &T {
        if self.value.is_none() || self.throttle.should_run(tick, self.phase) {
            self.computed_at = Some(tick);
            return self.value.insert(compute());
        }
        self.value.get_or_insert_with(compute)
    }

    /// Tick on which the cached value was last computed.
    #[inline]
    pub fn computed_at(&self) -> Option<Tick> {
        self.computed_at
    }

    #[inline]
    pub fn cached(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Drop the cached value so the next call recomputes unconditionally.
    pub fn invalidate(&mut self) {
        self.value = None;
        self.computed_at = None;
    }
}
