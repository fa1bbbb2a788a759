//! Timer Abstractions
//!
//! Embassy-backed time source for the control core.

use embassy_time::{block_for, Instant};

use crate::platform::Clock;
use crate::types::Timestamp;

/// Monotonic clock on the embassy time driver
///
/// `sleep` busy-waits: the control core runs synchronously inside the tick
/// loop and every delay it asks for is bounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl EmbassyClock {
    /// Create the clock
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for EmbassyClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(Instant::now().as_millis())
    }

    fn sleep(&mut self, duration: core::time::Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        block_for(embassy_time::Duration::from_micros(micros));
    }
}

/// Tracks how long each tick took and flags overruns
#[derive(Clone, Copy, Debug)]
pub struct TickBudget {
    budget: embassy_time::Duration,
    started: Option<Instant>,
    overruns: u32,
}

impl TickBudget {
    /// Create with the allowed tick duration
    #[must_use]
    pub const fn new(budget: embassy_time::Duration) -> Self {
        Self {
            budget,
            started: None,
            overruns: 0,
        }
    }

    /// Mark the start of a tick
    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Mark the end of a tick; returns the elapsed time if it overran
    pub fn end(&mut self) -> Option<embassy_time::Duration> {
        let elapsed = Instant::now() - self.started.take()?;
        if elapsed > self.budget {
            self.overruns = self.overruns.saturating_add(1);
            Some(elapsed)
        } else {
            None
        }
    }

    /// Overrun count since boot
    #[must_use]
    pub const fn overruns(&self) -> u32 {
        self.overruns
    }
}
