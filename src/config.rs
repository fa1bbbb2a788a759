//! System configuration and hardware constants
//!
//! Compile-time constants for the jammer board (pin map, bus speed, supply
//! divider, timings) plus the runtime [`JammerConfig`] that collects every
//! tunable the controller consumes.

use core::time::Duration;

use crate::power::{CriticalVoltagePolicy, VoltageThresholds};
use crate::radio::lifecycle::RetryPolicy;
use crate::radio::recovery::BusResetTimings;
use crate::types::{JammingMode, PowerLevel};

/// Number of transceivers on the board
pub const RADIO_COUNT: usize = 3;

/// SPI clock for the nRF24L01+ bus (chip maximum is 10 MHz)
pub const SPI_FREQUENCY_HZ: u32 = 8_000_000;

/// USART baud rate for the command port
pub const COMMAND_BAUD_RATE: u32 = 115_200;

/// Supply sense divider ratio (2:1 resistor divider)
pub const SUPPLY_DIVIDER_RATIO: f32 = 2.0;

/// ADC reference voltage
pub const ADC_VREF: f32 = 3.3;

/// Supply below this is classified `Low` (volts)
pub const VOLTAGE_LOW_THRESHOLD: f32 = 3.0;

/// Supply below this is classified `Critical` (volts)
pub const VOLTAGE_CRITICAL_THRESHOLD: f32 = 2.5;

/// Bring-up attempts per radio
pub const BRING_UP_MAX_ATTEMPTS: u8 = 30;

/// Delay between bring-up attempts in milliseconds
pub const BRING_UP_RETRY_DELAY_MS: u64 = 200;

/// Settling time between staged radio bring-ups in milliseconds
pub const STAGGER_DELAY_MS: u64 = 500;

/// Power-down hold before a bring-up cycle in milliseconds
pub const POWER_CYCLE_DELAY_MS: u64 = 100;

/// Automatic power ramp step interval in milliseconds
pub const RAMP_INTERVAL_MS: u64 = 2_000;

/// Channel hop interval in milliseconds
pub const HOP_INTERVAL_MS: u64 = 5;

/// Advisory voltage check interval in milliseconds
pub const VOLTAGE_CHECK_INTERVAL_MS: u64 = 2_000;

/// Periodic status report interval in milliseconds
pub const STATUS_REPORT_INTERVAL_MS: u64 = 10_000;

/// Pause between stop and start in a forced restart in milliseconds
pub const FORCE_RESTART_DELAY_MS: u64 = 1_000;

/// Pause between stop and start on a mode change in milliseconds
pub const MODE_CHANGE_DELAY_MS: u64 = 10;

/// Carrier off time during a self test in milliseconds
pub const SELF_TEST_SETTLE_MS: u64 = 100;

/// Settling time after switching the shared peripheral off in milliseconds
pub const SHARED_PERIPHERAL_SETTLE_MS: u64 = 10;

/// Host loop tick period in milliseconds
pub const TICK_INTERVAL_MS: u64 = 5;

/// Mode selected at power-on
pub const DEFAULT_MODE: JammingMode = JammingMode::Ble;

/// Power level every start begins its ramp from
pub const INITIAL_POWER_LEVEL: PowerLevel = PowerLevel::High;

/// Default seed for the channel-hop PRNG
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_0F_C4A7_11E5;

/// Command line buffer size
pub const COMMAND_BUFFER_SIZE: usize = 32;

/// Response buffer size
pub const RESPONSE_BUFFER_SIZE: usize = 64;

/// Parsed commands held between tick boundaries
pub const COMMAND_QUEUE_DEPTH: usize = 4;

/// DMA ring for serial receive; covers a full tick at the command baud rate
pub const SERIAL_RX_RING_SIZE: usize = 128;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// Supply sense ADC input
    pub const SUPPLY_SENSE: &str = "PA0";

    /// SPI1 SCK (shared by all radios)
    pub const SPI_SCK: &str = "PB3";

    /// SPI1 MISO
    pub const SPI_MISO: &str = "PB4";

    /// SPI1 MOSI
    pub const SPI_MOSI: &str = "PB5";

    /// Radio 1 chip enable
    pub const RADIO1_CE: &str = "PA8";

    /// Radio 1 chip select
    pub const RADIO1_CSN: &str = "PA9";

    /// Radio 2 chip enable
    pub const RADIO2_CE: &str = "PB0";

    /// Radio 2 chip select
    pub const RADIO2_CSN: &str = "PB1";

    /// Radio 3 chip enable
    pub const RADIO3_CE: &str = "PC6";

    /// Radio 3 chip select
    pub const RADIO3_CSN: &str = "PC7";

    /// Enable line of the sub-GHz module sharing the SPI bus (active high)
    pub const SHARED_PERIPHERAL_EN: &str = "PB10";

    /// Emergency stop button (active low)
    pub const STOP_BUTTON: &str = "PC13";

    /// USART2 TX (command port)
    pub const COMMAND_TX: &str = "PA2";

    /// USART2 RX (command port)
    pub const COMMAND_RX: &str = "PA3";
}

/// Runtime controller configuration
#[derive(Clone, Copy, Debug)]
pub struct JammerConfig {
    /// Per-radio bring-up retry policy
    pub retry: RetryPolicy,
    /// Settling time between staged bring-ups
    pub stagger_delay: Duration,
    /// Power-down hold before bring-up
    pub power_cycle_delay: Duration,
    /// Automatic ramp step interval
    pub ramp_interval: Duration,
    /// Channel hop interval (zero hops on every tick)
    pub hop_interval: Duration,
    /// Voltage band thresholds
    pub voltage: VoltageThresholds,
    /// Advisory voltage check interval
    pub voltage_check_interval: Duration,
    /// Reaction to a critical advisory reading
    pub critical_policy: CriticalVoltagePolicy,
    /// Periodic status report interval
    pub status_interval: Duration,
    /// Bus reset performed by `start`
    pub start_reset: BusResetTimings,
    /// Bus reset performed by `stop`
    pub stop_reset: BusResetTimings,
    /// Bus reset performed by the recovery protocol
    pub recovery_reset: BusResetTimings,
    /// Settling after the shared peripheral is switched off
    pub shared_peripheral_settle: Duration,
    /// Pause between stop and start in a forced restart
    pub force_restart_delay: Duration,
    /// Pause between stop and start on a mode change
    pub mode_change_delay: Duration,
    /// Carrier off time during a self test
    pub self_test_settle: Duration,
    /// Seed for the channel-hop PRNG
    pub rng_seed: u64,
}

impl Default for JammerConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy {
                max_attempts: BRING_UP_MAX_ATTEMPTS,
                retry_delay: Duration::from_millis(BRING_UP_RETRY_DELAY_MS),
            },
            stagger_delay: Duration::from_millis(STAGGER_DELAY_MS),
            power_cycle_delay: Duration::from_millis(POWER_CYCLE_DELAY_MS),
            ramp_interval: Duration::from_millis(RAMP_INTERVAL_MS),
            hop_interval: Duration::from_millis(HOP_INTERVAL_MS),
            voltage: VoltageThresholds::default(),
            voltage_check_interval: Duration::from_millis(VOLTAGE_CHECK_INTERVAL_MS),
            critical_policy: CriticalVoltagePolicy::Advisory,
            status_interval: Duration::from_millis(STATUS_REPORT_INTERVAL_MS),
            start_reset: BusResetTimings::START,
            stop_reset: BusResetTimings::STOP,
            recovery_reset: BusResetTimings::RECOVERY,
            shared_peripheral_settle: Duration::from_millis(SHARED_PERIPHERAL_SETTLE_MS),
            force_restart_delay: Duration::from_millis(FORCE_RESTART_DELAY_MS),
            mode_change_delay: Duration::from_millis(MODE_CHANGE_DELAY_MS),
            self_test_settle: Duration::from_millis(SELF_TEST_SETTLE_MS),
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}
