//! Hardware seams driven by the control core
//!
//! The control logic never touches registers or pins directly. Everything it
//! needs from the board goes through these traits, implemented by the HAL
//! layer on the target and by scripted mocks in host tests.

use core::time::Duration;

use crate::types::{Channel, CrcLength, DataRate, PowerLevel, Timestamp};

/// One physical 2.4 GHz transceiver
///
/// All operations are short, bounded bus transactions. Implementations must
/// not retry internally; retry policy lives in the lifecycle manager.
pub trait Transceiver {
    /// Driver error type
    type Error: core::fmt::Debug;

    /// Cold initialization of the chip
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Live connectivity probe (register readback)
    fn is_connected(&mut self) -> bool;

    /// Enable or disable auto-acknowledgement on all pipes
    fn set_auto_ack(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Hardware retransmit delay (250 us units) and count
    fn set_retries(&mut self, delay: u8, count: u8) -> Result<(), Self::Error>;

    /// Over-the-air data rate
    fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Self::Error>;

    /// Packet CRC length
    fn set_crc_length(&mut self, crc: CrcLength) -> Result<(), Self::Error>;

    /// PA output level
    fn set_power_level(&mut self, level: PowerLevel) -> Result<(), Self::Error>;

    /// RF channel
    fn set_channel(&mut self, channel: Channel) -> Result<(), Self::Error>;

    /// Start an unmodulated carrier at the given level and channel
    fn start_carrier(&mut self, level: PowerLevel, channel: Channel) -> Result<(), Self::Error>;

    /// Stop the carrier
    fn stop_carrier(&mut self) -> Result<(), Self::Error>;

    /// Enter power-down mode
    fn power_down(&mut self) -> Result<(), Self::Error>;

    /// Drive chip-enable low and chip-select high
    fn park_control_lines(&mut self);
}

/// Shared serial bus plus the board-level lines around it
pub trait ControlBus {
    /// Tear the bus peripheral down
    fn teardown(&mut self);

    /// Bring the bus peripheral back up
    fn reinitialize(&mut self);

    /// Make sure the other RF peripheral on the bus is powered down.
    /// No-op if it is already off.
    fn power_down_shared_peripheral(&mut self);
}

/// Supply rail measurement
pub trait VoltageSensor {
    /// Read the supply voltage in volts
    fn read_volts(&mut self) -> f32;
}

/// Time source and bounded sleep primitive
pub trait Clock {
    /// Current time
    fn now(&self) -> Timestamp;

    /// Block for a bounded duration
    fn sleep(&mut self, duration: Duration);
}

/// Cancellation source polled between bring-up attempts
pub trait CancelCheck {
    /// Returns true if the in-flight operation should abort
    fn cancel_requested(&mut self) -> bool;
}

/// Cancellation source that never fires
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    fn cancel_requested(&mut self) -> bool {
        false
    }
}

impl<F: FnMut() -> bool> CancelCheck for F {
    fn cancel_requested(&mut self) -> bool {
        self()
    }
}
