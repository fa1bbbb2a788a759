//! Host-side test doubles
//!
//! Scripted transceivers, bus, supply sensor and a simulated clock that
//! stand in for the board. Every double can share one [`Trace`] so tests
//! can assert on the order of hardware operations across components.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use jammer_firmware::config::JammerConfig;
use jammer_firmware::platform::{
    CancelCheck, ControlBus, Clock, NeverCancel, Transceiver, VoltageSensor,
};
use jammer_firmware::protocol::CommandInbox;
use jammer_firmware::radio::jammer::Jammer;
use jammer_firmware::types::{Channel, CrcLength, DataRate, PowerLevel, Timestamp};

// =============================================================================
// Shared operation trace
// =============================================================================

/// One hardware operation, in the order it happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Radio operation: (radio id, operation)
    Radio(u8, &'static str),
    /// Bus operation
    Bus(&'static str),
    /// Clock sleep in milliseconds
    Sleep(u64),
}

/// Shared, ordered list of hardware operations
#[derive(Clone, Debug, Default)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, event: &Event) -> usize {
        self.0.borrow().iter().filter(|e| *e == event).count()
    }

    pub fn position(&self, event: &Event) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == event)
    }

    pub fn last_position(&self, event: &Event) -> Option<usize> {
        self.0.borrow().iter().rposition(|e| e == event)
    }
}

// =============================================================================
// Transceiver
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Scripted transceiver
#[derive(Debug)]
pub struct MockRadio {
    pub id: u8,
    /// Result of the connectivity probe
    pub connected: bool,
    /// Probe starts answering once `begin` has been called this many times
    pub connect_after_begins: Option<u32>,
    pub begin_fails: bool,
    pub fail_configure: bool,
    pub fail_start_carrier: bool,
    pub fail_stop_carrier: bool,

    pub begin_calls: u32,
    pub probe_calls: u32,
    pub auto_ack: Option<bool>,
    pub retries: Option<(u8, u8)>,
    pub data_rate: Option<DataRate>,
    pub crc: Option<CrcLength>,
    pub power: Option<PowerLevel>,
    pub channel: Option<Channel>,
    /// Level and channel of the running carrier
    pub carrier: Option<(PowerLevel, Channel)>,
    pub carrier_starts: u32,
    pub powered_down: bool,
    pub parked: u32,
    pub trace: Trace,
}

impl MockRadio {
    /// Radio that answers the first probe
    pub fn present(id: u8) -> Self {
        Self {
            id,
            connected: true,
            connect_after_begins: None,
            begin_fails: false,
            fail_configure: false,
            fail_start_carrier: false,
            fail_stop_carrier: false,
            begin_calls: 0,
            probe_calls: 0,
            auto_ack: None,
            retries: None,
            data_rate: None,
            crc: None,
            power: None,
            channel: None,
            carrier: None,
            carrier_starts: 0,
            powered_down: false,
            parked: 0,
            trace: Trace::new(),
        }
    }

    /// Radio that never answers
    pub fn absent(id: u8) -> Self {
        Self {
            connected: false,
            ..Self::present(id)
        }
    }

    /// Radio that starts answering after `begins` calls to `begin`
    pub fn connects_after(id: u8, begins: u32) -> Self {
        Self {
            connected: false,
            connect_after_begins: Some(begins),
            ..Self::present(id)
        }
    }

    pub fn traced(mut self, trace: &Trace) -> Self {
        self.trace = trace.clone();
        self
    }

    fn log(&self, op: &'static str) {
        self.trace.push(Event::Radio(self.id, op));
    }

    fn configure_step(&self) -> Result<(), MockError> {
        if self.fail_configure {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

impl Transceiver for MockRadio {
    type Error = MockError;

    fn begin(&mut self) -> Result<(), MockError> {
        self.begin_calls += 1;
        self.log("begin");
        if let Some(n) = self.connect_after_begins {
            if self.begin_calls >= n {
                self.connected = true;
            }
        }
        if self.begin_fails {
            Err(MockError)
        } else {
            Ok(())
        }
    }

    fn is_connected(&mut self) -> bool {
        self.probe_calls += 1;
        self.connected
    }

    fn set_auto_ack(&mut self, enabled: bool) -> Result<(), MockError> {
        self.configure_step()?;
        self.auto_ack = Some(enabled);
        Ok(())
    }

    fn set_retries(&mut self, delay: u8, count: u8) -> Result<(), MockError> {
        self.configure_step()?;
        self.retries = Some((delay, count));
        Ok(())
    }

    fn set_data_rate(&mut self, rate: DataRate) -> Result<(), MockError> {
        self.configure_step()?;
        self.data_rate = Some(rate);
        Ok(())
    }

    fn set_crc_length(&mut self, crc: CrcLength) -> Result<(), MockError> {
        self.configure_step()?;
        self.crc = Some(crc);
        Ok(())
    }

    fn set_power_level(&mut self, level: PowerLevel) -> Result<(), MockError> {
        self.power = Some(level);
        if let Some((_, channel)) = self.carrier {
            self.carrier = Some((level, channel));
        }
        Ok(())
    }

    fn set_channel(&mut self, channel: Channel) -> Result<(), MockError> {
        self.channel = Some(channel);
        if let Some((level, _)) = self.carrier {
            self.carrier = Some((level, channel));
        }
        Ok(())
    }

    fn start_carrier(&mut self, level: PowerLevel, channel: Channel) -> Result<(), MockError> {
        if self.fail_start_carrier {
            return Err(MockError);
        }
        self.log("start_carrier");
        self.carrier_starts += 1;
        self.powered_down = false;
        self.power = Some(level);
        self.channel = Some(channel);
        self.carrier = Some((level, channel));
        Ok(())
    }

    fn stop_carrier(&mut self) -> Result<(), MockError> {
        if self.fail_stop_carrier {
            return Err(MockError);
        }
        self.log("stop_carrier");
        self.carrier = None;
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), MockError> {
        self.log("power_down");
        self.carrier = None;
        self.powered_down = true;
        Ok(())
    }

    fn park_control_lines(&mut self) {
        self.log("park");
        self.parked += 1;
    }
}

// =============================================================================
// Control bus
// =============================================================================

/// Bus double counting resets and shared-peripheral requests
#[derive(Debug)]
pub struct MockBus {
    pub online: bool,
    pub teardowns: u32,
    pub reinits: u32,
    pub shared_power_downs: u32,
    pub trace: Trace,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            online: true,
            teardowns: 0,
            reinits: 0,
            shared_power_downs: 0,
            trace: Trace::new(),
        }
    }

    pub fn traced(mut self, trace: &Trace) -> Self {
        self.trace = trace.clone();
        self
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlBus for MockBus {
    fn teardown(&mut self) {
        self.trace.push(Event::Bus("teardown"));
        self.online = false;
        self.teardowns += 1;
    }

    fn reinitialize(&mut self) {
        self.trace.push(Event::Bus("reinitialize"));
        self.online = true;
        self.reinits += 1;
    }

    fn power_down_shared_peripheral(&mut self) {
        self.trace.push(Event::Bus("shared_off"));
        self.shared_power_downs += 1;
    }
}

// =============================================================================
// Supply sensor
// =============================================================================

/// Sensor returning queued readings, then a steady fallback
#[derive(Debug)]
pub struct ScriptedSensor {
    pub readings: VecDeque<f32>,
    pub fallback: f32,
    pub reads: u32,
}

impl ScriptedSensor {
    pub fn steady(volts: f32) -> Self {
        Self {
            readings: VecDeque::new(),
            fallback: volts,
            reads: 0,
        }
    }

    pub fn sequence(readings: &[f32], fallback: f32) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
            fallback,
            reads: 0,
        }
    }
}

impl VoltageSensor for ScriptedSensor {
    fn read_volts(&mut self) -> f32 {
        self.reads += 1;
        self.readings.pop_front().unwrap_or(self.fallback)
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Simulated clock; sleeping advances time instantly
#[derive(Debug, Default)]
pub struct SimClock {
    now_ms: u64,
    pub slept: Vec<Duration>,
    pub trace: Option<Trace>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traced(mut self, trace: &Trace) -> Self {
        self.trace = Some(trace.clone());
        self
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn total_slept(&self) -> Duration {
        self.slept.iter().sum()
    }
}

impl Clock for SimClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.now_ms)
    }

    fn sleep(&mut self, duration: Duration) {
        let ms = u64::try_from(duration.as_millis()).unwrap();
        if let Some(trace) = &self.trace {
            trace.push(Event::Sleep(ms));
        }
        self.now_ms += ms;
        self.slept.push(duration);
    }
}

// =============================================================================
// Serial input
// =============================================================================

/// Serial port whose bytes arrive one chunk per poll, the way the DMA ring
/// fills while a bring-up blocks the control loop
#[derive(Default)]
pub struct ScriptedSerial {
    pub inbox: CommandInbox,
    pub chunks: VecDeque<&'static [u8]>,
    pub polls: u32,
}

impl ScriptedSerial {
    pub fn new(chunks: &[&'static [u8]]) -> Self {
        Self {
            inbox: CommandInbox::new(),
            chunks: chunks.iter().copied().collect(),
            polls: 0,
        }
    }
}

impl CancelCheck for ScriptedSerial {
    fn cancel_requested(&mut self) -> bool {
        self.polls += 1;
        if let Some(chunk) = self.chunks.pop_front() {
            self.inbox.push_bytes(chunk);
        }
        self.inbox.cancel_pending()
    }
}

// =============================================================================
// Rigs
// =============================================================================

pub type TestJammer<K = NeverCancel> = Jammer<MockRadio, MockBus, ScriptedSensor, SimClock, K>;

pub const NOMINAL_VOLTS: f32 = 3.7;
pub const LOW_VOLTS: f32 = 2.8;
pub const CRITICAL_VOLTS: f32 = 2.2;

pub fn all_present() -> [MockRadio; 3] {
    [MockRadio::present(1), MockRadio::present(2), MockRadio::present(3)]
}

pub fn jammer(radios: [MockRadio; 3]) -> TestJammer {
    jammer_with(radios, ScriptedSensor::steady(NOMINAL_VOLTS), JammerConfig::default())
}

pub fn jammer_with(
    radios: [MockRadio; 3],
    sensor: ScriptedSensor,
    config: JammerConfig,
) -> TestJammer {
    Jammer::new(radios, MockBus::new(), sensor, SimClock::new(), NeverCancel, config)
}

/// Jammer that takes its cancellation from a scripted serial port
pub fn serial_jammer(radios: [MockRadio; 3], serial: ScriptedSerial) -> TestJammer<ScriptedSerial> {
    Jammer::new(
        radios,
        MockBus::new(),
        ScriptedSensor::steady(NOMINAL_VOLTS),
        SimClock::new(),
        serial,
        JammerConfig::default(),
    )
}

/// Jammer whose radios, bus and clock all write to one trace
pub fn traced_jammer(radios: [MockRadio; 3], trace: &Trace) -> TestJammer {
    let radios = radios.map(|r| r.traced(trace));
    Jammer::new(
        radios,
        MockBus::new().traced(trace),
        ScriptedSensor::steady(NOMINAL_VOLTS),
        SimClock::new().traced(trace),
        NeverCancel,
        JammerConfig::default(),
    )
}
