//! Jammer Session State
//!
//! Single source of truth for the jammer's operating state: activity,
//! selected mode, current power level, ramp bookkeeping and the faults
//! raised since the last start.

use heapless::Vec;

use crate::config::INITIAL_POWER_LEVEL;
use crate::power::VoltageSample;
use crate::types::{Activity, JammingMode, PowerLevel, RadioSlot, Timestamp};

/// Maximum number of distinct faults retained per session
pub const MAX_FAULTS: usize = 8;

/// Condition raised during operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Radio exhausted its bring-up attempts
    ConnectFailed(RadioSlot),
    /// A start finished with zero connected radios
    AllRadiosFailed,
    /// Advisory check read a low supply
    VoltageLow,
    /// Advisory check read a critical supply
    VoltageCritical,
    /// Radio stopped answering while paused
    RadioDropped(RadioSlot),
    /// Bring-up sequence aborted by the cancel source
    BringUpCancelled,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Fault {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ConnectFailed(slot) => defmt::write!(f, "connect failed ({})", slot),
            Self::AllRadiosFailed => defmt::write!(f, "all radios failed"),
            Self::VoltageLow => defmt::write!(f, "voltage low"),
            Self::VoltageCritical => defmt::write!(f, "voltage critical"),
            Self::RadioDropped(slot) => defmt::write!(f, "radio dropped ({})", slot),
            Self::BringUpCancelled => defmt::write!(f, "bring-up cancelled"),
        }
    }
}

/// Mutable session state
#[derive(Clone, Debug)]
pub struct JammerSession {
    /// Overall activity
    pub activity: Activity,
    /// Selected channel profile
    pub mode: JammingMode,
    /// Level applied to every active radio
    pub power_level: PowerLevel,
    /// Set once the ramp reached MAX or power was set manually
    pub ramp_complete: bool,
    /// Last automatic ramp step
    pub last_power_increase: Timestamp,
    /// Last channel hop
    pub last_channel_change: Timestamp,
    /// Last advisory voltage check
    pub last_voltage_check: Timestamp,
    /// Last periodic status report
    pub last_status_report: Timestamp,
    /// Most recent advisory reading
    pub last_voltage: Option<VoltageSample>,
    /// Starts in a row that ended with zero radios
    pub consecutive_failed_starts: u8,
    /// Faults raised since the last start
    pub faults: Vec<Fault, MAX_FAULTS>,
}

impl JammerSession {
    /// Fresh inactive session
    #[must_use]
    pub fn new(mode: JammingMode) -> Self {
        Self {
            activity: Activity::Inactive,
            mode,
            power_level: INITIAL_POWER_LEVEL,
            ramp_complete: false,
            last_power_increase: Timestamp::ZERO,
            last_channel_change: Timestamp::ZERO,
            last_voltage_check: Timestamp::ZERO,
            last_status_report: Timestamp::ZERO,
            last_voltage: None,
            consecutive_failed_starts: 0,
            faults: Vec::new(),
        }
    }

    /// Back to inactive
    ///
    /// Keeps the selected mode, the failure streak, the faults and the last
    /// voltage reading, so the reason for a stop stays visible in status.
    /// Faults are cleared by the next start.
    pub fn reset(&mut self) {
        let mode = self.mode;
        let failed = self.consecutive_failed_starts;
        let faults = core::mem::take(&mut self.faults);
        let last_voltage = self.last_voltage.take();
        *self = Self::new(mode);
        self.consecutive_failed_starts = failed;
        self.faults = faults;
        self.last_voltage = last_voltage;
    }

    /// Restart the power ramp from the initial level
    pub fn reset_ramp(&mut self, now: Timestamp) {
        self.power_level = INITIAL_POWER_LEVEL;
        self.ramp_complete = false;
        self.last_power_increase = now;
        self.last_channel_change = now;
        self.last_voltage_check = now;
        self.last_status_report = now;
    }

    /// Record a fault. Duplicates are ignored; the oldest entry is dropped
    /// when the list is full.
    pub fn record_fault(&mut self, fault: Fault) {
        if self.faults.contains(&fault) {
            return;
        }
        if self.faults.is_full() {
            self.faults.remove(0);
        }
        // Cannot fail, a slot was freed above
        let _ = self.faults.push(fault);
    }

    /// Forget all recorded faults
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Check whether a fault has been recorded
    #[must_use]
    pub fn has_fault(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    /// Active or paused
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.activity, Activity::Inactive)
    }

    /// Paused
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self.activity, Activity::Paused)
    }

    /// Transmitting (active and not paused)
    #[must_use]
    pub const fn is_transmitting(&self) -> bool {
        matches!(self.activity, Activity::Active)
    }
}

impl Default for JammerSession {
    fn default() -> Self {
        Self::new(JammingMode::default())
    }
}
