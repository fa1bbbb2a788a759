//! Communication Protocols
//!
//! Semicolon-terminated text commands on the serial port, in the style of a
//! CAT interface: `START;`, `PWR?;`, `RETRY2;` and so on. The parser turns
//! bytes into [`HostCommand`]s, [`dispatch`] runs them against the jammer
//! and [`Response`] renders the reply.

use core::fmt::Write;

use heapless::{Deque, String, Vec};

use crate::config::{COMMAND_BUFFER_SIZE, COMMAND_QUEUE_DEPTH, RESPONSE_BUFFER_SIZE};
use crate::platform::{CancelCheck, Clock, ControlBus, Transceiver, VoltageSensor};
use crate::radio::jammer::{
    CommandOutcome, Jammer, JammerCommand, JammerStatus, SelfTestReport, SelfTestResult,
    TransitionError,
};
use crate::radio::lifecycle::BringUpReport;
use crate::types::{JammingMode, PowerLevel, RadioSlot};

/// Command parsed from serial input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    /// State-changing operator command
    Control(JammerCommand),
    /// `MODE?`
    ReadMode,
    /// `PWR?`
    ReadPower,
    /// `ST?`
    ReadStatus,
    /// Unrecognized command (first characters kept)
    Unknown(String<8>),
}

impl HostCommand {
    /// Whether this command should abort a bring-up that is still running
    #[must_use]
    pub const fn cancels_bring_up(&self) -> bool {
        matches!(
            self,
            Self::Control(JammerCommand::Stop | JammerCommand::Pause)
        )
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for HostCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Control(cmd) => defmt::write!(f, "{}", cmd),
            Self::ReadMode => defmt::write!(f, "MODE?"),
            Self::ReadPower => defmt::write!(f, "PWR?"),
            Self::ReadStatus => defmt::write!(f, "ST?"),
            Self::Unknown(s) => defmt::write!(f, "unknown({=str})", s.as_str()),
        }
    }
}

/// Byte-at-a-time command parser
pub struct CommandParser {
    buffer: Vec<u8, COMMAND_BUFFER_SIZE>,
    /// Set after an overflow; bytes are dropped until the next `;`
    discarding: bool,
}

impl CommandParser {
    /// Create a new parser
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feed a byte to the parser
    /// Returns a command if one is complete
    pub fn feed(&mut self, byte: u8) -> Option<HostCommand> {
        match byte {
            b';' => {
                let cmd = if self.discarding {
                    None
                } else {
                    self.parse_buffer()
                };
                self.clear();
                cmd
            }
            b'\r' | b'\n' | b' ' => None,
            _ if self.discarding => None,
            _ => {
                let _ = self.buffer.push(byte.to_ascii_uppercase());
                // Overlong input is garbage, drop the whole line
                if self.buffer.is_full() {
                    self.buffer.clear();
                    self.discarding = true;
                }
                None
            }
        }
    }

    /// Feed a slice, collecting every completed command
    pub fn feed_all<const N: usize>(&mut self, bytes: &[u8]) -> Vec<HostCommand, N> {
        let mut commands = Vec::new();
        for &byte in bytes {
            if let Some(cmd) = self.feed(byte) {
                if commands.push(cmd).is_err() {
                    break;
                }
            }
        }
        commands
    }

    fn parse_buffer(&self) -> Option<HostCommand> {
        if self.buffer.is_empty() {
            return None;
        }
        let cmd = core::str::from_utf8(&self.buffer).ok()?;

        let parsed = match cmd {
            "START" => HostCommand::Control(JammerCommand::Start),
            "STOP" => HostCommand::Control(JammerCommand::Stop),
            "PAUSE" => HostCommand::Control(JammerCommand::Pause),
            "RESUME" => HostCommand::Control(JammerCommand::Resume),
            "MODE" => HostCommand::Control(JammerCommand::CycleMode),
            "MODE?" => HostCommand::ReadMode,
            "RESTART" => HostCommand::Control(JammerCommand::Restart),
            "FORCE" => HostCommand::Control(JammerCommand::ForceRestart),
            "PWR?" => HostCommand::ReadPower,
            "PWRMAX" => HostCommand::Control(JammerCommand::SetMaxPower),
            "PWRCYC" => HostCommand::Control(JammerCommand::CyclePowerLevel),
            "TURBO" => HostCommand::Control(JammerCommand::TurboBoost),
            "TEST" => HostCommand::Control(JammerCommand::SelfTest),
            "ST?" => HostCommand::ReadStatus,
            _ => Self::parse_retry(cmd).unwrap_or_else(|| Self::unknown(cmd)),
        };
        Some(parsed)
    }

    fn parse_retry(cmd: &str) -> Option<HostCommand> {
        let digits = cmd.strip_prefix("RETRY")?;
        let number: u8 = digits.parse().ok()?;
        let slot = RadioSlot::from_number(number)?;
        Some(HostCommand::Control(JammerCommand::RetryRadio(slot)))
    }

    fn unknown(cmd: &str) -> HostCommand {
        HostCommand::Unknown(cmd.chars().filter(char::is_ascii).take(8).collect())
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsed commands waiting for the control loop
///
/// Bytes can be pushed at any point, including from inside a blocking
/// bring-up through [`CancelCheck`]. A queued stop or pause requests
/// cancellation until it is taken off the queue.
pub struct CommandInbox {
    parser: CommandParser,
    queue: Deque<HostCommand, COMMAND_QUEUE_DEPTH>,
}

impl CommandInbox {
    /// Empty inbox
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parser: CommandParser::new(),
            queue: Deque::new(),
        }
    }

    /// Parse received bytes, queueing every completed command
    ///
    /// When the queue is full a new command is dropped, unless it cancels a
    /// bring-up; then the oldest queued command makes room for it.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let Some(command) = self.parser.feed(byte) else {
                continue;
            };
            if self.queue.is_full() {
                if !command.cancels_bring_up() {
                    warn!("command queue full, dropping command");
                    continue;
                }
                warn!("command queue full, dropping oldest");
                let _ = self.queue.pop_front();
            }
            // Room was made above
            let _ = self.queue.push_back(command);
        }
    }

    /// Take the oldest queued command
    pub fn next_command(&mut self) -> Option<HostCommand> {
        self.queue.pop_front()
    }

    /// Whether a stop or pause is waiting
    #[must_use]
    pub fn cancel_pending(&self) -> bool {
        self.queue.iter().any(HostCommand::cancels_bring_up)
    }

    /// Number of queued commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Nothing queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop a partially received command, keeping the queue
    pub fn discard_partial(&mut self) {
        self.parser.clear();
    }
}

impl Default for CommandInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelCheck for CommandInbox {
    fn cancel_requested(&mut self) -> bool {
        self.cancel_pending()
    }
}

/// Reply formatter
pub struct Response {
    buffer: String<RESPONSE_BUFFER_SIZE>,
}

impl Response {
    /// Create an empty response
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Plain acknowledgement
    pub fn ok(&mut self) {
        self.buffer.clear();
        let _ = self.buffer.push_str("OK;");
    }

    /// Rejected command
    pub fn error(&mut self, error: &TransitionError) {
        self.buffer.clear();
        let _ = write!(self.buffer, "ER:{error};");
    }

    /// Unrecognized command
    pub fn unknown(&mut self) {
        self.buffer.clear();
        let _ = self.buffer.push_str("?;");
    }

    /// Mode reply
    pub fn mode(&mut self, mode: JammingMode) {
        self.buffer.clear();
        let _ = write!(self.buffer, "MODE{};", mode.name());
    }

    /// Power reply
    pub fn power(&mut self, level: PowerLevel) {
        self.buffer.clear();
        let _ = write!(self.buffer, "PWR{};", level.name());
    }

    /// Bring-up summary: number of radios that came up
    pub fn started(&mut self, report: &BringUpReport) {
        self.buffer.clear();
        let _ = write!(self.buffer, "UP{};", report.active_count());
    }

    /// Resume summary
    pub fn resumed(&mut self, count: usize) {
        self.buffer.clear();
        let _ = write!(self.buffer, "RS{count};");
    }

    /// Retry queued
    pub fn retry_queued(&mut self, slot: RadioSlot) {
        self.buffer.clear();
        let _ = write!(self.buffer, "RETRY{};", slot.number());
    }

    /// Self-test result per slot: P pass, D disconnected, F failed, - skipped
    pub fn self_test(&mut self, report: &SelfTestReport) {
        self.buffer.clear();
        let _ = self.buffer.push_str("TEST");
        for result in report.results {
            let code = match result {
                SelfTestResult::Skipped => '-',
                SelfTestResult::Passed => 'P',
                SelfTestResult::Disconnected => 'D',
                SelfTestResult::Failed => 'F',
            };
            let _ = self.buffer.push(code);
        }
        let _ = self.buffer.push(';');
    }

    /// Status reply
    ///
    /// `ST<activity>,<mode>,<power>,<r1><r2><r3>,<ramp>,<failed starts>;`
    /// where each radio digit is 1 when active and the ramp digit is 1 when
    /// complete.
    pub fn status(&mut self, status: &JammerStatus) {
        self.buffer.clear();
        let _ = write!(
            self.buffer,
            "ST{},{},{},",
            status.activity.code(),
            status.mode.name(),
            status.power_level.name()
        );
        for radio in &status.radios {
            let _ = self.buffer.push(if radio.active { '1' } else { '0' });
        }
        let _ = write!(
            self.buffer,
            ",{},{};",
            u8::from(status.ramp_complete),
            status.consecutive_failed_starts
        );
    }

    /// Render a command outcome
    pub fn outcome(&mut self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::Done => self.ok(),
            CommandOutcome::Started(report) => self.started(report),
            CommandOutcome::Resumed(count) => self.resumed(*count),
            CommandOutcome::Mode(mode) => self.mode(*mode),
            CommandOutcome::Power(level) => self.power(*level),
            CommandOutcome::RetryQueued(slot) => self.retry_queued(*slot),
            CommandOutcome::SelfTest(report) => self.self_test(report),
        }
    }

    /// Get the response string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Get the response bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a host command and render the reply
pub fn dispatch<T, B, S, C, K>(
    jammer: &mut Jammer<T, B, S, C, K>,
    command: &HostCommand,
    response: &mut Response,
) where
    T: Transceiver,
    B: ControlBus,
    S: VoltageSensor,
    C: Clock,
    K: CancelCheck,
{
    match command {
        HostCommand::Control(cmd) => match jammer.execute(*cmd) {
            Ok(outcome) => response.outcome(&outcome),
            Err(error) => response.error(&error),
        },
        HostCommand::ReadMode => response.mode(jammer.current_mode()),
        HostCommand::ReadPower => response.power(jammer.current_power_level()),
        HostCommand::ReadStatus => response.status(&jammer.status()),
        HostCommand::Unknown(_) => response.unknown(),
    }
}
