//! Shared types used across the jammer firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;
use core::time::Duration;

/// 2.4 GHz transceiver channel (0-125, 1 MHz spacing from 2400 MHz)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    /// Highest channel the nRF24L01+ synthesizer accepts
    pub const MAX: u8 = 125;

    /// Create a channel, returns None if out of range
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number <= Self::MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Get the channel number
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Get the carrier frequency in MHz
    #[must_use]
    pub const fn frequency_mhz(self) -> u16 {
        2400 + self.0 as u16
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.0)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Channel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ch{}", self.0);
    }
}

/// Build a channel table at compile time
const fn channel_table<const N: usize>(numbers: [u8; N]) -> [Channel; N] {
    let mut table = [Channel(0); N];
    let mut i = 0;
    while i < N {
        assert!(numbers[i] <= Channel::MAX);
        table[i] = Channel(numbers[i]);
        i += 1;
    }
    table
}

const BLE_CHANNELS: [Channel; 3] = channel_table([2, 26, 80]);

const CLASSIC_CHANNELS: [Channel; 21] = channel_table([
    32, 34, 46, 48, 50, 52, 0, 1, 2, 4, 6, 8, 22, 24, 26, 28, 30, 74, 76, 78, 80,
]);

const ALL_CHANNELS: [Channel; 21] = channel_table([
    0, 1, 2, 4, 6, 8, 22, 24, 26, 28, 30, 32, 34, 46, 48, 50, 52, 74, 76, 78, 80,
]);

const SLOT1_STARTUP: [Channel; 4] = channel_table([2, 5, 8, 11]);
const SLOT2_STARTUP: [Channel; 4] = channel_table([26, 29, 32, 35]);
const SLOT3_STARTUP: [Channel; 4] = channel_table([80, 83, 86, 89]);

/// Channel-set profile used for hopping
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JammingMode {
    /// BLE advertising channels only
    #[default]
    Ble,
    /// Classic Bluetooth hop range
    ClassicBluetooth,
    /// Union of the BLE and classic ranges
    All,
}

impl JammingMode {
    /// Ordered channel set for this mode (never empty)
    #[must_use]
    pub const fn channels(self) -> &'static [Channel] {
        match self {
            Self::Ble => &BLE_CHANNELS,
            Self::ClassicBluetooth => &CLASSIC_CHANNELS,
            Self::All => &ALL_CHANNELS,
        }
    }

    /// Check whether a channel belongs to this mode's set
    #[must_use]
    pub fn contains(self, channel: Channel) -> bool {
        self.channels().contains(&channel)
    }

    /// Cycle to next mode
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Ble => Self::ClassicBluetooth,
            Self::ClassicBluetooth => Self::All,
            Self::All => Self::Ble,
        }
    }

    /// Short display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ble => "BLE",
            Self::ClassicBluetooth => "Bluetooth",
            Self::All => "ALL",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for JammingMode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.name());
    }
}

/// Transmit power level (nRF24L01+ PA setting)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PowerLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    #[default]
    High,
    /// 0 dBm
    Max,
}

impl PowerLevel {
    /// Next rung of the automatic ramp (never decreases)
    #[must_use]
    pub const fn ramp_step(self) -> Self {
        match self {
            Self::Min | Self::Low => Self::High,
            Self::High | Self::Max => Self::Max,
        }
    }

    /// Next level of the manual LOW -> HIGH -> MAX -> LOW cycle
    #[must_use]
    pub const fn next_in_cycle(self) -> Self {
        match self {
            Self::Min | Self::Max => Self::Low,
            Self::Low => Self::High,
            Self::High => Self::Max,
        }
    }

    /// Output power in dBm
    #[must_use]
    pub const fn dbm(self) -> i8 {
        match self {
            Self::Min => -18,
            Self::Low => -12,
            Self::High => -6,
            Self::Max => 0,
        }
    }

    /// `RF_PWR` field value (bits 2:1 of `RF_SETUP`)
    #[must_use]
    pub const fn rf_pwr_bits(self) -> u8 {
        let code = match self {
            Self::Min => 0b00,
            Self::Low => 0b01,
            Self::High => 0b10,
            Self::Max => 0b11,
        };
        code << 1
    }

    /// Short display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Min => "MIN",
            Self::Low => "LOW",
            Self::High => "HIGH",
            Self::Max => "MAX",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerLevel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.name());
    }
}

/// Over-the-air data rate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataRate {
    /// 250 kbps
    Kbps250,
    /// 1 Mbps
    #[default]
    Mbps1,
    /// 2 Mbps
    Mbps2,
}

/// Packet CRC length
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CrcLength {
    /// CRC disabled
    Disabled,
    /// 8-bit CRC
    #[default]
    Bits8,
    /// 16-bit CRC
    Bits16,
}

/// Physical radio position on the board (1-3)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RadioSlot {
    /// Radio 1, brought up first
    One,
    /// Radio 2
    Two,
    /// Radio 3, brought up last
    Three,
}

impl RadioSlot {
    /// All slots in bring-up order
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// Slot from its 1-based number
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// 1-based slot number
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// 0-based index into per-radio arrays
    #[must_use]
    pub const fn index(self) -> usize {
        self.number() as usize - 1
    }

    /// Channel group this slot is brought up on
    #[must_use]
    pub const fn startup_channels(self) -> &'static [Channel] {
        match self {
            Self::One => &SLOT1_STARTUP,
            Self::Two => &SLOT2_STARTUP,
            Self::Three => &SLOT3_STARTUP,
        }
    }
}

impl fmt::Display for RadioSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Radio {}", self.number())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioSlot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Radio {}", self.number());
    }
}

/// Overall jammer activity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Activity {
    /// Radios powered down
    #[default]
    Inactive,
    /// Carriers transmitting (possibly on zero radios)
    Active,
    /// Carriers halted, radios still configured
    Paused,
}

impl Activity {
    /// Single-letter code used in status responses
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Inactive => 'I',
            Self::Active => 'A',
            Self::Paused => 'P',
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Activity {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Inactive => defmt::write!(f, "INACTIVE"),
            Self::Active => defmt::write!(f, "ACTIVE"),
            Self::Paused => defmt::write!(f, "PAUSED"),
        }
    }
}

/// Monotonic time in milliseconds since boot
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Boot time
    pub const ZERO: Self = Self(0);

    /// Create from milliseconds since boot
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Milliseconds since boot
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since an earlier timestamp (zero if `earlier` is later)
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// Advance by a duration
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Timestamp {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}ms", self.0);
    }
}
