//! Power Ramp Control
//!
//! Time-driven HIGH -> MAX ramp plus the manual power overrides. Every
//! manual override leaves the ramp complete so the automatic step never
//! fights an operator choice.

use core::time::Duration;

use crate::platform::Transceiver;
use crate::radio::handle::RadioHandle;
use crate::radio::session::JammerSession;
use crate::types::{PowerLevel, Timestamp};

/// Automatic power ramp
#[derive(Clone, Copy, Debug)]
pub struct PowerRampController {
    interval: Duration,
}

impl PowerRampController {
    /// Create a ramp stepping once per `interval`
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Advance the ramp if a step is due
    ///
    /// Runs only while transmitting with the ramp incomplete, and only once
    /// strictly more than the interval has passed since the last step.
    /// Returns the new level when a step was taken.
    pub fn tick<T: Transceiver>(
        &self,
        session: &mut JammerSession,
        radios: &mut [RadioHandle<T>],
        now: Timestamp,
    ) -> Option<PowerLevel> {
        if !session.is_transmitting() || session.ramp_complete {
            return None;
        }
        if now.saturating_since(session.last_power_increase) <= self.interval {
            return None;
        }

        let level = session.power_level.ramp_step();
        session.power_level = level;
        session.last_power_increase = now;
        if level == PowerLevel::Max {
            session.ramp_complete = true;
            info!("power ramp complete at {}", level);
        } else {
            info!("power ramp step to {}", level);
        }

        apply_level(radios, level);
        Some(level)
    }

    /// Jump straight to MAX
    pub fn set_max_power<T: Transceiver>(
        &self,
        session: &mut JammerSession,
        radios: &mut [RadioHandle<T>],
    ) -> PowerLevel {
        set_manual(session, radios, PowerLevel::Max)
    }

    /// Rotate LOW -> HIGH -> MAX -> LOW
    pub fn cycle_power_level<T: Transceiver>(
        &self,
        session: &mut JammerSession,
        radios: &mut [RadioHandle<T>],
    ) -> PowerLevel {
        let level = session.power_level.next_in_cycle();
        set_manual(session, radios, level)
    }

    /// Immediate MAX on every radio
    pub fn turbo_boost<T: Transceiver>(
        &self,
        session: &mut JammerSession,
        radios: &mut [RadioHandle<T>],
    ) -> PowerLevel {
        info!("turbo boost");
        set_manual(session, radios, PowerLevel::Max)
    }
}

impl Default for PowerRampController {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::config::RAMP_INTERVAL_MS))
    }
}

fn set_manual<T: Transceiver>(
    session: &mut JammerSession,
    radios: &mut [RadioHandle<T>],
    level: PowerLevel,
) -> PowerLevel {
    session.power_level = level;
    session.ramp_complete = true;
    info!("power level set to {}", level);
    apply_level(radios, level);
    level
}

/// Record `level` on every radio and push it to the active, connected ones
fn apply_level<T: Transceiver>(radios: &mut [RadioHandle<T>], level: PowerLevel) {
    for radio in radios.iter_mut() {
        if radio.set_power_level(level).is_err() {
            warn!("{}: failed to apply power level", radio.slot());
        }
    }
}
