//! Monotonic millisecond clocks.
//!
//! Timestamps are 32-bit and wrap after ~49.7 days of uptime, like the
//! millisecond counters on most microcontrollers. Never compare two
//! timestamps directly; use [`elapsed_since`].

use std::cell::Cell;
use std::time::Instant;

/// Wrapping millisecond timestamp.
pub type Millis = u32;

/// Milliseconds from `earlier` to `now`, correct across one wraparound.
#[inline]
pub fn elapsed_since(now: Millis, earlier: Millis) -> Millis {
    now.wrapping_sub(earlier)
}

/// Source of monotonic wrapping milliseconds.
pub trait Clock {
    /// Current timestamp.
    fn now_millis(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> Millis {
        (**self).now_millis()
    }
}

/// Clock backed by [`Instant`], truncated to 32 bits.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock reading zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Manually advanced clock for tests and simulation.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    /// Create a clock at `start`.
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Set the current timestamp.
    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    /// Advance by `ms`, wrapping.
    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Millis {
        self.now.get()
    }
}
