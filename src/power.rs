//! Power Supervision
//!
//! Supply voltage measurement, safety-band classification and the periodic
//! advisory check run while the jammer is transmitting.

use core::fmt;
use core::time::Duration;

use crate::config::{VOLTAGE_CRITICAL_THRESHOLD, VOLTAGE_LOW_THRESHOLD};
use crate::platform::VoltageSensor;
use crate::radio::session::{Fault, JammerSession};
use crate::types::Timestamp;

/// Supply voltage reading
#[derive(Clone, Copy, Debug)]
pub struct SupplyVoltage {
    /// Raw ADC reading (12-bit)
    raw: u16,
    /// Voltage divider ratio
    divider_ratio: f32,
    /// Reference voltage
    vref: f32,
}

impl SupplyVoltage {
    /// Create from ADC reading
    #[must_use]
    pub const fn from_adc(raw: u16, divider_ratio: f32, vref: f32) -> Self {
        Self {
            raw,
            divider_ratio,
            vref,
        }
    }

    /// Get voltage in volts
    #[must_use]
    pub fn volts(&self) -> f32 {
        (f32::from(self.raw) / 4095.0) * self.vref * self.divider_ratio
    }
}

/// Safety band a supply reading falls into
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum VoltageBand {
    /// Safe for staged bring-up and full operation
    Nominal,
    /// Below the low threshold
    Low,
    /// Below the critical threshold
    Critical,
}

impl VoltageBand {
    /// Check if the band allows further radio bring-up
    #[must_use]
    pub const fn is_nominal(self) -> bool {
        matches!(self, Self::Nominal)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VoltageBand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Nominal => defmt::write!(f, "NOMINAL"),
            Self::Low => defmt::write!(f, "LOW"),
            Self::Critical => defmt::write!(f, "CRITICAL"),
        }
    }
}

/// Band thresholds in volts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoltageThresholds {
    /// Readings below this are `Low`
    pub low: f32,
    /// Readings below this are `Critical`
    pub critical: f32,
}

impl VoltageThresholds {
    /// Classify a reading
    #[must_use]
    pub fn classify(&self, volts: f32) -> VoltageBand {
        if volts < self.critical {
            VoltageBand::Critical
        } else if volts < self.low {
            VoltageBand::Low
        } else {
            VoltageBand::Nominal
        }
    }
}

impl Default for VoltageThresholds {
    fn default() -> Self {
        Self {
            low: VOLTAGE_LOW_THRESHOLD,
            critical: VOLTAGE_CRITICAL_THRESHOLD,
        }
    }
}

/// Classified instantaneous reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoltageSample {
    /// Measured supply voltage
    pub volts: f32,
    /// Safety band
    pub band: VoltageBand,
}

impl fmt::Display for VoltageSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}V", self.volts)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VoltageSample {
    fn format(&self, f: defmt::Formatter) {
        let v = self.volts.max(0.0);
        let whole = v as u32;
        let frac = ((v - whole as f32) * 100.0) as u32;
        defmt::write!(f, "{}.{}{}V ({})", whole, frac / 10, frac % 10, self.band);
    }
}

/// What the controller does when an advisory check reads `Critical`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CriticalVoltagePolicy {
    /// Report only; the operator decides
    #[default]
    Advisory,
    /// Power down the highest-numbered active radio on each critical check
    ShedRadio,
    /// Stop the jammer
    Stop,
}

#[cfg(feature = "embedded")]
impl defmt::Format for CriticalVoltagePolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Advisory => defmt::write!(f, "advisory"),
            Self::ShedRadio => defmt::write!(f, "shed-radio"),
            Self::Stop => defmt::write!(f, "stop"),
        }
    }
}

/// Supply voltage supervisor
pub struct PowerSupervisor<S> {
    sensor: S,
    thresholds: VoltageThresholds,
    check_interval: Duration,
}

impl<S: VoltageSensor> PowerSupervisor<S> {
    /// Create a new supervisor
    pub const fn new(sensor: S, thresholds: VoltageThresholds, check_interval: Duration) -> Self {
        Self {
            sensor,
            thresholds,
            check_interval,
        }
    }

    /// Take and classify one reading
    pub fn sample(&mut self) -> VoltageSample {
        let volts = self.sensor.read_volts();
        VoltageSample {
            volts,
            band: self.thresholds.classify(volts),
        }
    }

    /// Periodic check during active operation
    ///
    /// Returns the sample when a check was due. Low and Critical readings are
    /// logged and recorded as faults on the session; no corrective action is
    /// taken here.
    pub fn advisory_check(
        &mut self,
        session: &mut JammerSession,
        now: Timestamp,
    ) -> Option<VoltageSample> {
        if now.saturating_since(session.last_voltage_check) <= self.check_interval {
            return None;
        }
        session.last_voltage_check = now;

        let sample = self.sample();
        session.last_voltage = Some(sample);

        match sample.band {
            VoltageBand::Nominal => {}
            VoltageBand::Low => {
                warn!("supply voltage low during operation: {}", sample);
                session.record_fault(Fault::VoltageLow);
            }
            VoltageBand::Critical => {
                error!("supply voltage critical during operation: {}", sample);
                session.record_fault(Fault::VoltageCritical);
            }
        }

        Some(sample)
    }

    /// Access the sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Mutable access to the sensor
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}
