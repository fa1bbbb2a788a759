//! Bus and Radio Recovery
//!
//! Hard reset of the shared SPI bus and every radio's control lines, used to
//! get out of an inconsistent low-level state without rebooting the MCU.

use core::time::Duration;

use crate::platform::{Clock, ControlBus, Transceiver};
use crate::radio::handle::RadioHandle;

/// Settling delays around a bus reset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusResetTimings {
    /// Wait after tearing the bus down
    pub after_teardown: Duration,
    /// Wait after bringing the bus back up
    pub after_reinit: Duration,
    /// Hold after parking the control lines
    pub line_hold: Duration,
}

impl BusResetTimings {
    /// Reset performed at the start of `start`
    pub const START: Self = Self::from_millis(200, 200, 300);

    /// Reset performed by `stop`
    pub const STOP: Self = Self::from_millis(100, 100, 200);

    /// Reset performed by the recovery protocol
    pub const RECOVERY: Self = Self::from_millis(500, 500, 1000);

    /// Build from millisecond values
    #[must_use]
    pub const fn from_millis(after_teardown: u64, after_reinit: u64, line_hold: u64) -> Self {
        Self {
            after_teardown: Duration::from_millis(after_teardown),
            after_reinit: Duration::from_millis(after_reinit),
            line_hold: Duration::from_millis(line_hold),
        }
    }
}

/// Tear down and reinitialize the bus, then park every radio's lines
pub fn reset_bus<T, B, C>(
    bus: &mut B,
    radios: &mut [RadioHandle<T>],
    clock: &mut C,
    timings: &BusResetTimings,
) where
    T: Transceiver,
    B: ControlBus,
    C: Clock,
{
    debug!("resetting SPI bus");
    bus.teardown();
    clock.sleep(timings.after_teardown);
    bus.reinitialize();
    clock.sleep(timings.after_reinit);

    for radio in radios.iter_mut() {
        radio.park();
    }
    clock.sleep(timings.line_hold);
}

/// Full radio recovery sequence
#[derive(Clone, Copy, Debug)]
pub struct RecoveryProtocol {
    timings: BusResetTimings,
}

impl RecoveryProtocol {
    /// Create with the given bus reset timings
    #[must_use]
    pub const fn new(timings: BusResetTimings) -> Self {
        Self { timings }
    }

    /// Run the recovery sequence
    ///
    /// Carriers are stopped only on radios flagged active; everything else
    /// runs unconditionally, so a second call leaves the same end state.
    pub fn reset<T, B, C>(&self, radios: &mut [RadioHandle<T>], bus: &mut B, clock: &mut C)
    where
        T: Transceiver,
        B: ControlBus,
        C: Clock,
    {
        info!("recovering radio state");

        for radio in radios.iter_mut().filter(|r| r.is_active()) {
            if radio.stop_carrier().is_err() {
                warn!("{}: stop carrier failed during recovery", radio.slot());
            }
        }
        for radio in radios.iter_mut() {
            if radio.power_down().is_err() {
                warn!("{}: power down failed during recovery", radio.slot());
            }
        }

        reset_bus(bus, radios, clock, &self.timings);
        bus.power_down_shared_peripheral();

        for radio in radios.iter_mut() {
            radio.mark_inactive();
        }
        info!("radio state reset");
    }
}

impl Default for RecoveryProtocol {
    fn default() -> Self {
        Self::new(BusResetTimings::RECOVERY)
    }
}
