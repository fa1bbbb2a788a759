//! ADC Driver
//!
//! Supply rail measurement through the resistor divider on the sense pin.

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

use crate::config::{ADC_VREF, SUPPLY_DIVIDER_RATIO};
use crate::platform::VoltageSensor;
use crate::power::SupplyVoltage;

/// Supply voltage sensor on ADC1
pub struct SupplySensor<'d> {
    adc: Adc<'d, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl<'d> SupplySensor<'d> {
    /// Create the sensor with a long sample time for the high-impedance
    /// divider
    #[must_use]
    pub fn new(mut adc: Adc<'d, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc, channel }
    }

    /// Raw reading
    pub fn read(&mut self) -> SupplyVoltage {
        let raw = self.adc.blocking_read(&mut self.channel);
        SupplyVoltage::from_adc(raw, SUPPLY_DIVIDER_RATIO, ADC_VREF)
    }
}

impl VoltageSensor for SupplySensor<'_> {
    fn read_volts(&mut self) -> f32 {
        self.read().volts()
    }
}
