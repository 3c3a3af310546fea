//! Interarrival countdown
//!
//! Bots act only when their countdown fires, then draw the next interval.
//! Intervals are `NonZeroU32`, so a countdown can never be armed at zero.

use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(interval: NonZeroU32) -> Self {
        Self {
            remaining: interval.get(),
        }
    }

    /// Arm with a drawn interval; zero is clamped to one tick
    pub fn from_draw(interval: u32) -> Self {
        Self::new(NonZeroU32::new(interval).unwrap_or(NonZeroU32::MIN))
    }

    /// Advance one tick. True when the countdown reaches zero.
    pub fn tick_and_check(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn reset(&mut self, interval: NonZeroU32) {
        self.remaining = interval.get();
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
