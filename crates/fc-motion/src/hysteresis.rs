//! Debouncing of the raw blocked signal into a published stopped state.
//!
//! The raw signal can flip every tick (a worker brushing past the edge of a
//! safety radius).  Horn and beeper cues hang off the *published* state, so
//! a raw change must persist for `dwell_secs` of accumulated simulated time
//! before the published state follows.  Any tick on which raw agrees with
//! the published state resets the accumulated time.

/// Direction of a published stopped-state change.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StopTransition {
    Stopped,
    Resumed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HysteresisGate {
    published_stopped: bool,
    timer:             f32,
    dwell_secs:        f32,
}

impl HysteresisGate {
    pub fn new(dwell_secs: f32) -> Self {
        Self { published_stopped: false, timer: 0.0, dwell_secs }
    }

    #[inline]
    pub fn published_stopped(&self) -> bool {
        self.published_stopped
    }

    /// Time the current disagreement has persisted, seconds.
    #[inline]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Feed one tick's raw signal.  Returns the transition, if the published
    /// state flipped on this tick.
    pub fn update(&mut self, raw_blocked: bool, delta: f32) -> Option<StopTransition> {
        if raw_blocked == self.published_stopped {
            self.timer = 0.0;
            return None;
        }
        self.timer += delta;
        if self.timer < self.dwell_secs {
            return None;
        }
        self.published_stopped = raw_blocked;
        self.timer = 0.0;
        Some(if raw_blocked { StopTransition::Stopped } else { StopTransition::Resumed })
    }
}
