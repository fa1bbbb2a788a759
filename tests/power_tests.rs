//! Power Supervision Tests
//!
//! Supply conversion, band classification and the advisory check.
//! Run with: cargo test --no-default-features --features std --test power_tests

mod common;

use std::time::Duration;

use common::{ScriptedSensor, CRITICAL_VOLTS, LOW_VOLTS, NOMINAL_VOLTS};
use jammer_firmware::power::{
    PowerSupervisor, SupplyVoltage, VoltageBand, VoltageSample, VoltageThresholds,
};
use jammer_firmware::radio::session::{Fault, JammerSession};
use jammer_firmware::types::{Activity, Timestamp};

fn supervisor(sensor: ScriptedSensor) -> PowerSupervisor<ScriptedSensor> {
    PowerSupervisor::new(sensor, VoltageThresholds::default(), Duration::from_millis(2_000))
}

fn active_session() -> JammerSession {
    let mut session = JammerSession::default();
    session.activity = Activity::Active;
    session
}

// =============================================================================
// Supply Voltage Tests
// =============================================================================

#[test]
fn supply_from_adc_full_scale() {
    // Full scale through a 2:1 divider is twice Vref
    let supply = SupplyVoltage::from_adc(4095, 2.0, 3.3);
    assert!((supply.volts() - 6.6).abs() < 0.01);
}

#[test]
fn supply_from_adc_single_cell() {
    // 3.7V cell: (3.7 / 2) / 3.3 * 4095 = 2296
    let supply = SupplyVoltage::from_adc(2296, 2.0, 3.3);
    assert!((supply.volts() - 3.7).abs() < 0.01, "got {}", supply.volts());
}

#[test]
fn supply_from_adc_zero() {
    assert_eq!(SupplyVoltage::from_adc(0, 2.0, 3.3).volts(), 0.0);
}

// =============================================================================
// Classification Tests
// =============================================================================

#[test]
fn classify_bands() {
    let t = VoltageThresholds::default();
    assert_eq!(t.classify(3.7), VoltageBand::Nominal);
    assert_eq!(t.classify(2.9), VoltageBand::Low);
    assert_eq!(t.classify(2.4), VoltageBand::Critical);
}

#[test]
fn classify_boundaries_are_exclusive() {
    let t = VoltageThresholds::default();
    // Thresholds are strict "below"
    assert_eq!(t.classify(3.0), VoltageBand::Nominal);
    assert_eq!(t.classify(2.5), VoltageBand::Low);
}

#[test]
fn band_nominal_check() {
    assert!(VoltageBand::Nominal.is_nominal());
    assert!(!VoltageBand::Low.is_nominal());
    assert!(!VoltageBand::Critical.is_nominal());
}

#[test]
fn sample_display() {
    let sample = VoltageSample {
        volts: 3.456,
        band: VoltageBand::Nominal,
    };
    assert_eq!(sample.to_string(), "3.46V");
}

// =============================================================================
// Supervisor Tests
// =============================================================================

#[test]
fn sample_is_a_plain_read() {
    let mut sup = supervisor(ScriptedSensor::sequence(&[3.7, 2.8], NOMINAL_VOLTS));
    assert_eq!(sup.sample().band, VoltageBand::Nominal);
    assert_eq!(sup.sample().band, VoltageBand::Low);
    assert_eq!(sup.sensor().reads, 2);
}

#[test]
fn advisory_check_waits_for_interval() {
    let mut sup = supervisor(ScriptedSensor::steady(NOMINAL_VOLTS));
    let mut session = active_session();

    assert!(sup
        .advisory_check(&mut session, Timestamp::from_millis(2_000))
        .is_none());
    assert_eq!(sup.sensor().reads, 0);

    let sample = sup.advisory_check(&mut session, Timestamp::from_millis(2_001));
    assert!(sample.is_some());
    assert_eq!(session.last_voltage_check, Timestamp::from_millis(2_001));
    assert_eq!(session.last_voltage, sample);
}

#[test]
fn advisory_check_records_low() {
    let mut sup = supervisor(ScriptedSensor::steady(LOW_VOLTS));
    let mut session = active_session();

    let sample = sup
        .advisory_check(&mut session, Timestamp::from_millis(5_000))
        .unwrap();
    assert_eq!(sample.band, VoltageBand::Low);
    assert!(session.has_fault(Fault::VoltageLow));
    // Advisory only: nothing else changes
    assert_eq!(session.activity, Activity::Active);
}

#[test]
fn advisory_check_records_critical() {
    let mut sup = supervisor(ScriptedSensor::steady(CRITICAL_VOLTS));
    let mut session = active_session();

    sup.advisory_check(&mut session, Timestamp::from_millis(5_000));
    assert!(session.has_fault(Fault::VoltageCritical));
    assert!(!session.has_fault(Fault::VoltageLow));
}

#[test]
fn advisory_check_nominal_records_nothing() {
    let mut sup = supervisor(ScriptedSensor::steady(NOMINAL_VOLTS));
    let mut session = active_session();

    sup.advisory_check(&mut session, Timestamp::from_millis(5_000));
    assert!(session.faults.is_empty());
}

// =============================================================================
// Session Fault Tests
// =============================================================================

#[test]
fn faults_are_deduplicated() {
    let mut session = JammerSession::default();
    session.record_fault(Fault::VoltageLow);
    session.record_fault(Fault::VoltageLow);
    assert_eq!(session.faults.len(), 1);
}

#[test]
fn faults_drop_oldest_when_full() {
    use jammer_firmware::types::RadioSlot;

    let mut session = JammerSession::default();
    let faults = [
        Fault::VoltageLow,
        Fault::VoltageCritical,
        Fault::AllRadiosFailed,
        Fault::BringUpCancelled,
        Fault::ConnectFailed(RadioSlot::One),
        Fault::ConnectFailed(RadioSlot::Two),
        Fault::ConnectFailed(RadioSlot::Three),
        Fault::RadioDropped(RadioSlot::One),
        Fault::RadioDropped(RadioSlot::Two),
    ];
    for fault in faults {
        session.record_fault(fault);
    }
    assert_eq!(session.faults.len(), 8);
    assert!(!session.has_fault(Fault::VoltageLow));
    assert!(session.has_fault(Fault::RadioDropped(RadioSlot::Two)));
}

#[test]
fn session_reset_keeps_mode_streak_and_faults() {
    use jammer_firmware::types::JammingMode;

    let mut session = JammerSession::new(JammingMode::All);
    let mut sup = supervisor(ScriptedSensor::steady(CRITICAL_VOLTS));
    session.activity = Activity::Paused;
    session.ramp_complete = true;
    session.consecutive_failed_starts = 2;
    session.record_fault(Fault::AllRadiosFailed);
    session.last_voltage = Some(sup.sample());

    session.reset();
    assert_eq!(session.activity, Activity::Inactive);
    assert_eq!(session.mode, JammingMode::All);
    assert!(!session.ramp_complete);
    assert_eq!(session.consecutive_failed_starts, 2);
    assert!(session.has_fault(Fault::AllRadiosFailed));
    assert_eq!(
        session.last_voltage.map(|s| s.band),
        Some(VoltageBand::Critical)
    );

    session.clear_faults();
    assert!(session.faults.is_empty());
}
