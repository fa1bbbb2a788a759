//! Radio Handle
//!
//! Owns one physical transceiver together with the state the controller
//! tracks for it: slot identity, the active flag and the last power level
//! and channel applied.

use crate::platform::Transceiver;
use crate::types::{Channel, CrcLength, DataRate, PowerLevel, RadioSlot};

/// Hardware retransmit delay used in carrier mode (host retries instead)
const CARRIER_RETRY_DELAY: u8 = 0;

/// Hardware retransmit count used in carrier mode
const CARRIER_RETRY_COUNT: u8 = 0;

/// One transceiver and its tracked state
///
/// `active` means configured and transmitting. It is distinct from
/// connectivity, which is always a live probe and never cached.
pub struct RadioHandle<T> {
    slot: RadioSlot,
    device: T,
    active: bool,
    power: PowerLevel,
    channel: Channel,
}

impl<T: Transceiver> RadioHandle<T> {
    /// Wrap a transceiver in the given slot
    pub fn new(slot: RadioSlot, device: T) -> Self {
        let channel = slot.startup_channels()[0];
        Self {
            slot,
            device,
            active: false,
            power: PowerLevel::default(),
            channel,
        }
    }

    /// Board slot
    #[must_use]
    pub const fn slot(&self) -> RadioSlot {
        self.slot
    }

    /// Configured and transmitting
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Last power level applied
    #[must_use]
    pub const fn power(&self) -> PowerLevel {
        self.power
    }

    /// Last channel applied
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Live connectivity probe
    pub fn is_connected(&mut self) -> bool {
        self.device.is_connected()
    }

    /// Borrow the transceiver
    pub fn device(&self) -> &T {
        &self.device
    }

    /// Mutably borrow the transceiver
    pub fn device_mut(&mut self) -> &mut T {
        &mut self.device
    }

    /// Cold initialization
    pub fn begin(&mut self) -> Result<(), T::Error> {
        self.device.begin()
    }

    /// Configure for continuous carrier and start transmitting on the first
    /// channel of `channels`
    pub fn configure_for_carrier(
        &mut self,
        channels: &[Channel],
        level: PowerLevel,
    ) -> Result<(), T::Error> {
        let channel = channels.first().copied().unwrap_or(self.channel);

        self.device.set_auto_ack(false)?;
        self.device.set_retries(CARRIER_RETRY_DELAY, CARRIER_RETRY_COUNT)?;
        self.device.set_power_level(level)?;
        self.device.set_data_rate(DataRate::Mbps2)?;
        self.device.set_crc_length(CrcLength::Disabled)?;
        self.device.set_channel(channel)?;
        self.device.start_carrier(level, channel)?;

        self.power = level;
        self.channel = channel;
        self.active = true;
        Ok(())
    }

    /// Record a new power level, pushing it to the chip if the radio is
    /// active and still answering
    pub fn set_power_level(&mut self, level: PowerLevel) -> Result<(), T::Error> {
        self.power = level;
        if self.active && self.device.is_connected() {
            self.device.set_power_level(level)?;
        }
        Ok(())
    }

    /// Record a new channel, pushing it to the chip if the radio is active
    /// and still answering
    pub fn set_channel(&mut self, channel: Channel) -> Result<(), T::Error> {
        self.channel = channel;
        if self.active && self.device.is_connected() {
            self.device.set_channel(channel)?;
        }
        Ok(())
    }

    /// Restart the carrier at the recorded power and channel
    pub fn start_carrier(&mut self) -> Result<(), T::Error> {
        self.device.set_power_level(self.power)?;
        self.device.set_channel(self.channel)?;
        self.device.start_carrier(self.power, self.channel)
    }

    /// Halt the carrier, keeping the configuration
    pub fn stop_carrier(&mut self) -> Result<(), T::Error> {
        self.device.stop_carrier()
    }

    /// Enter power-down mode
    pub fn power_down(&mut self) -> Result<(), T::Error> {
        self.device.power_down()
    }

    /// Drive the control lines to their inactive levels
    pub fn park(&mut self) {
        self.device.park_control_lines();
    }

    /// Clear the active flag
    pub fn mark_inactive(&mut self) {
        self.active = false;
    }
}

#[cfg(feature = "embedded")]
impl<T> defmt::Format for RadioHandle<T> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} active={} {} {}",
            self.slot,
            self.active,
            self.power,
            self.channel
        );
    }
}
