//! Jammer State Machine
//!
//! Top-level controller. Owns the session, the three radios, the bus and the
//! supervisors, and exposes the operator commands plus a cooperative
//! [`Jammer::tick`] driven by the host loop.
//!
//! ```text
//!            start              pause
//! Inactive ─────────▶ Active ─────────▶ Paused
//!    ▲                 │  ▲    resume     │
//!    │      stop       │  └───────────────┘
//!    └─────────────────┴──────────────────┘
//! ```

use core::fmt;

use heapless::Vec;

use crate::config::{JammerConfig, DEFAULT_MODE, RADIO_COUNT};
use crate::platform::{CancelCheck, Clock, ControlBus, NeverCancel, Transceiver, VoltageSensor};
use crate::power::{CriticalVoltagePolicy, PowerSupervisor, VoltageBand, VoltageSample};
use crate::radio::handle::RadioHandle;
use crate::radio::hop::ChannelHopScheduler;
use crate::radio::lifecycle::{BringUpOutcome, BringUpReport, LifecycleManager, SlotOutcome};
use crate::radio::ramp::PowerRampController;
use crate::radio::recovery::{reset_bus, RecoveryProtocol};
use crate::radio::session::{Fault, JammerSession, MAX_FAULTS};
use crate::types::{Activity, Channel, JammingMode, PowerLevel, RadioSlot};

/// Operator command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JammerCommand {
    /// Bring radios up and start transmitting
    Start,
    /// Halt everything and power down
    Stop,
    /// Halt carriers, keep radios configured
    Pause,
    /// Restart carriers after a pause
    Resume,
    /// Switch to the next channel profile
    CycleMode,
    /// Recovery sequence then start
    Restart,
    /// Stop, wait, then start from scratch
    ForceRestart,
    /// Jump to MAX power
    SetMaxPower,
    /// Rotate LOW -> HIGH -> MAX -> LOW
    CyclePowerLevel,
    /// Immediate MAX power
    TurboBoost,
    /// Queue a bring-up for one inactive radio
    RetryRadio(RadioSlot),
    /// Restart every active carrier
    SelfTest,
}

impl JammerCommand {
    /// Short name used in logs and errors
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::CycleMode => "cycle-mode",
            Self::Restart => "restart",
            Self::ForceRestart => "force-restart",
            Self::SetMaxPower => "max-power",
            Self::CyclePowerLevel => "cycle-power",
            Self::TurboBoost => "turbo",
            Self::RetryRadio(_) => "retry",
            Self::SelfTest => "self-test",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for JammerCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::RetryRadio(slot) => defmt::write!(f, "retry {}", slot),
            other => defmt::write!(f, "{=str}", other.name()),
        }
    }
}

/// Rejected command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// Command not allowed in the current state
    InvalidState {
        /// Command name
        command: &'static str,
        /// State the jammer was in
        from: Activity,
    },
    /// Retry requested for a radio that is already transmitting
    RadioAlreadyActive(RadioSlot),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { command, from } => {
                write!(f, "cannot {command} while {from:?}")
            }
            Self::RadioAlreadyActive(slot) => write!(f, "{slot} is already active"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TransitionError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidState { command, from } => {
                defmt::write!(f, "cannot {=str} while {}", command, from);
            }
            Self::RadioAlreadyActive(slot) => defmt::write!(f, "{} is already active", slot),
        }
    }
}

/// Successful command result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Nothing further to report
    Done,
    /// A bring-up ran
    Started(BringUpReport),
    /// Radios whose carrier resumed
    Resumed(usize),
    /// Mode now in effect
    Mode(JammingMode),
    /// Power level now in effect
    Power(PowerLevel),
    /// Retry queued for the next tick
    RetryQueued(RadioSlot),
    /// Self test finished
    SelfTest(SelfTestReport),
}

/// Live view of one radio
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioStatus {
    /// Board slot
    pub slot: RadioSlot,
    /// Configured and transmitting
    pub active: bool,
    /// Result of a live probe
    pub connected: bool,
    /// Last power level applied
    pub power: PowerLevel,
    /// Last channel applied
    pub channel: Channel,
}

/// Snapshot returned by [`Jammer::status`]
#[derive(Clone, Debug)]
pub struct JammerStatus {
    /// Overall activity
    pub activity: Activity,
    /// Selected profile
    pub mode: JammingMode,
    /// Current power level
    pub power_level: PowerLevel,
    /// Automatic ramp finished or overridden
    pub ramp_complete: bool,
    /// Per-radio view in slot order
    pub radios: [RadioStatus; RADIO_COUNT],
    /// Most recent advisory reading
    pub last_voltage: Option<VoltageSample>,
    /// Starts in a row that ended with zero radios
    pub consecutive_failed_starts: u8,
    /// Faults raised since the last start
    pub faults: Vec<Fault, MAX_FAULTS>,
}

impl JammerStatus {
    /// Number of radios flagged active
    #[must_use]
    pub fn active_radios(&self) -> usize {
        self.radios.iter().filter(|r| r.active).count()
    }

    /// Jammer is running with no radio transmitting
    #[must_use]
    pub fn all_radios_failed(&self) -> bool {
        self.activity != Activity::Inactive && self.active_radios() == 0
    }
}

/// Per-slot self-test result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelfTestResult {
    /// Radio not active, not tested
    #[default]
    Skipped,
    /// Carrier restarted
    Passed,
    /// Radio active but not answering
    Disconnected,
    /// Radio answered but a carrier command failed
    Failed,
}

/// Self-test report in slot order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SelfTestReport {
    /// Results indexed by slot
    pub results: [SelfTestResult; RADIO_COUNT],
}

impl SelfTestReport {
    /// Result for one slot
    #[must_use]
    pub const fn result(&self, slot: RadioSlot) -> SelfTestResult {
        self.results[slot.index()]
    }
}

/// What one tick did
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// Advisory reading, if a check was due
    pub voltage: Option<VoltageSample>,
    /// Radio powered down by the critical-voltage policy
    pub shed: Option<RadioSlot>,
    /// Jammer stopped by the critical-voltage policy
    pub stopped: bool,
    /// Queued retries serviced this tick
    pub retries: Vec<(RadioSlot, SlotOutcome), RADIO_COUNT>,
    /// New power level from the automatic ramp
    pub power_step: Option<PowerLevel>,
    /// Channel hopped to
    pub hop: Option<Channel>,
    /// Periodic status report emitted
    pub status_reported: bool,
}

/// Multi-radio jammer controller
pub struct Jammer<T, B, S, C, K = NeverCancel> {
    session: JammerSession,
    lifecycle: LifecycleManager<T>,
    supervisor: PowerSupervisor<S>,
    ramp: PowerRampController,
    hop: ChannelHopScheduler,
    recovery: RecoveryProtocol,
    bus: B,
    clock: C,
    cancel: K,
    config: JammerConfig,
}

impl<T, B, S, C, K> Jammer<T, B, S, C, K>
where
    T: Transceiver,
    B: ControlBus,
    S: VoltageSensor,
    C: Clock,
    K: CancelCheck,
{
    /// Assemble a controller around the board's hardware
    pub fn new(
        radios: [T; RADIO_COUNT],
        bus: B,
        sensor: S,
        clock: C,
        cancel: K,
        config: JammerConfig,
    ) -> Self {
        Self {
            session: JammerSession::new(DEFAULT_MODE),
            lifecycle: LifecycleManager::new(
                radios,
                config.retry,
                config.stagger_delay,
                config.power_cycle_delay,
            ),
            supervisor: PowerSupervisor::new(sensor, config.voltage, config.voltage_check_interval),
            ramp: PowerRampController::new(config.ramp_interval),
            hop: ChannelHopScheduler::new(config.hop_interval, config.rng_seed),
            recovery: RecoveryProtocol::new(config.recovery_reset),
            bus,
            clock,
            cancel,
            config,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Active or paused
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Paused
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    /// Overall activity
    #[must_use]
    pub const fn activity(&self) -> Activity {
        self.session.activity
    }

    /// Selected channel profile
    #[must_use]
    pub const fn current_mode(&self) -> JammingMode {
        self.session.mode
    }

    /// Current power level
    #[must_use]
    pub const fn current_power_level(&self) -> PowerLevel {
        self.session.power_level
    }

    /// Automatic ramp finished or overridden
    #[must_use]
    pub const fn ramp_complete(&self) -> bool {
        self.session.ramp_complete
    }

    /// One radio's active flag
    #[must_use]
    pub fn is_radio_active(&self, slot: RadioSlot) -> bool {
        self.lifecycle.radio(slot).is_active()
    }

    /// Full status snapshot (probes every radio)
    pub fn status(&mut self) -> JammerStatus {
        let radios = RadioSlot::ALL.map(|slot| {
            let radio = self.lifecycle.radio_mut(slot);
            RadioStatus {
                slot,
                active: radio.is_active(),
                connected: radio.is_connected(),
                power: radio.power(),
                channel: radio.channel(),
            }
        });

        JammerStatus {
            activity: self.session.activity,
            mode: self.session.mode,
            power_level: self.session.power_level,
            ramp_complete: self.session.ramp_complete,
            radios,
            last_voltage: self.session.last_voltage,
            consecutive_failed_starts: self.session.consecutive_failed_starts,
            faults: self.session.faults.clone(),
        }
    }

    /// Session state
    #[must_use]
    pub const fn session(&self) -> &JammerSession {
        &self.session
    }

    /// Handle for one slot
    #[must_use]
    pub fn radio(&self, slot: RadioSlot) -> &RadioHandle<T> {
        self.lifecycle.radio(slot)
    }

    /// Mutable handle for one slot
    pub fn radio_mut(&mut self, slot: RadioSlot) -> &mut RadioHandle<T> {
        self.lifecycle.radio_mut(slot)
    }

    /// Slots waiting for a retry
    #[must_use]
    pub fn pending_retries(&self) -> &[RadioSlot] {
        self.lifecycle.pending_retries()
    }

    /// Control bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Time source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable time source
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Mutable voltage sensor
    pub fn sensor_mut(&mut self) -> &mut S {
        self.supervisor.sensor_mut()
    }

    /// Mutable cancel source
    pub fn cancel_mut(&mut self) -> &mut K {
        &mut self.cancel
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &JammerConfig {
        &self.config
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Bring the radios up and start transmitting
    ///
    /// Allowed from Inactive and Active. An Active jammer is brought up
    /// again from scratch.
    pub fn start(&mut self) -> Result<BringUpReport, TransitionError> {
        if self.session.is_paused() {
            return Err(self.invalid(JammerCommand::Start));
        }
        Ok(self.activate())
    }

    /// Halt carriers, power down and reset the bus
    ///
    /// Allowed from any state; stopping an inactive jammer repeats the
    /// shutdown sequence.
    pub fn stop(&mut self) {
        info!("stopping jammer");

        for radio in self.lifecycle.radios_mut().iter_mut().filter(|r| r.is_active()) {
            if radio.stop_carrier().is_err() {
                warn!("{}: stop carrier failed", radio.slot());
            }
        }
        self.lifecycle.power_down_all();
        self.lifecycle.cancel_retries();

        reset_bus(
            &mut self.bus,
            self.lifecycle.radios_mut(),
            &mut self.clock,
            &self.config.stop_reset,
        );
        self.bus.power_down_shared_peripheral();

        self.lifecycle.clear_active_flags();
        self.session.reset();
        info!("jammer stopped");
    }

    /// Halt carriers; radios stay configured
    pub fn pause(&mut self) -> Result<(), TransitionError> {
        if !self.session.is_transmitting() {
            return Err(self.invalid(JammerCommand::Pause));
        }
        self.halt_carriers();
        self.session.activity = Activity::Paused;
        info!("jammer paused");
        Ok(())
    }

    /// Restart carriers on every radio still answering
    ///
    /// Each radio gets its stored power level and channel back. A radio that
    /// stopped answering while paused is marked inactive and reported.
    /// Returns the number of radios resumed.
    pub fn resume(&mut self) -> Result<usize, TransitionError> {
        if !self.session.is_paused() {
            return Err(self.invalid(JammerCommand::Resume));
        }

        let mut resumed = 0;
        for radio in self.lifecycle.radios_mut().iter_mut() {
            if !radio.is_active() {
                continue;
            }
            if !radio.is_connected() {
                warn!("{}: lost while paused", radio.slot());
                radio.mark_inactive();
                self.session.record_fault(Fault::RadioDropped(radio.slot()));
                continue;
            }
            if radio.start_carrier().is_ok() {
                resumed += 1;
            } else {
                warn!("{}: failed to resume carrier", radio.slot());
            }
        }

        self.session.activity = Activity::Active;
        info!("jammer resumed on {} radios", resumed);
        Ok(resumed)
    }

    /// Switch to the next channel profile
    ///
    /// An inactive jammer only records the new mode. A running jammer is
    /// stopped and started again on the new set; a paused one is paused
    /// again afterwards.
    pub fn cycle_mode(&mut self) -> JammingMode {
        let mode = self.session.mode.next();
        let previous = self.session.activity;
        info!("mode change to {}", mode);

        if previous == Activity::Inactive {
            self.session.mode = mode;
            return mode;
        }

        self.stop();
        self.clock.sleep(self.config.mode_change_delay);
        self.session.mode = mode;
        self.activate();

        if previous == Activity::Paused {
            self.halt_carriers();
            self.session.activity = Activity::Paused;
        }
        mode
    }

    /// Run the recovery protocol, then start
    ///
    /// Allowed from any state.
    pub fn restart(&mut self) -> BringUpReport {
        info!("restarting jammer");
        self.lifecycle.cancel_retries();
        self.recovery
            .reset(self.lifecycle.radios_mut(), &mut self.bus, &mut self.clock);
        self.session.activity = Activity::Inactive;
        self.activate()
    }

    /// Stop, wait, clear every active flag, then start
    pub fn force_restart(&mut self) -> BringUpReport {
        info!("force restarting jammer");
        self.stop();
        self.clock.sleep(self.config.force_restart_delay);
        self.lifecycle.clear_active_flags();
        self.activate()
    }

    // =========================================================================
    // Power controls
    // =========================================================================

    /// Jump to MAX power and finish the ramp
    pub fn set_max_power(&mut self) -> PowerLevel {
        self.ramp
            .set_max_power(&mut self.session, self.lifecycle.radios_mut())
    }

    /// Rotate LOW -> HIGH -> MAX -> LOW and finish the ramp
    pub fn cycle_power_level(&mut self) -> PowerLevel {
        self.ramp
            .cycle_power_level(&mut self.session, self.lifecycle.radios_mut())
    }

    /// Immediate MAX power on every radio
    pub fn turbo_boost(&mut self) -> PowerLevel {
        self.ramp
            .turbo_boost(&mut self.session, self.lifecycle.radios_mut())
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Queue a bring-up of one inactive radio for the next tick
    pub fn retry_radio(&mut self, slot: RadioSlot) -> Result<(), TransitionError> {
        if !self.session.is_transmitting() {
            return Err(self.invalid(JammerCommand::RetryRadio(slot)));
        }
        if self.lifecycle.radio(slot).is_active() {
            return Err(TransitionError::RadioAlreadyActive(slot));
        }
        if self.lifecycle.request_retry(slot) {
            info!("{}: retry queued", slot);
        }
        Ok(())
    }

    /// Probe every active radio and restart its carrier
    pub fn self_test(&mut self) -> Result<SelfTestReport, TransitionError> {
        if !self.session.is_transmitting() {
            return Err(self.invalid(JammerCommand::SelfTest));
        }

        let settle = self.config.self_test_settle;
        let mut report = SelfTestReport::default();
        for radio in self.lifecycle.radios_mut().iter_mut() {
            let slot = radio.slot();
            if !radio.is_active() {
                continue;
            }
            report.results[slot.index()] = if !radio.is_connected() {
                warn!("{}: self test, disconnected", slot);
                SelfTestResult::Disconnected
            } else if radio.stop_carrier().is_err() {
                SelfTestResult::Failed
            } else {
                self.clock.sleep(settle);
                if radio.start_carrier().is_ok() {
                    info!("{}: self test, carrier restarted", slot);
                    SelfTestResult::Passed
                } else {
                    SelfTestResult::Failed
                }
            };
        }
        Ok(report)
    }

    /// Run one command
    pub fn execute(&mut self, command: JammerCommand) -> Result<CommandOutcome, TransitionError> {
        debug!("command {}", command);
        match command {
            JammerCommand::Start => self.start().map(CommandOutcome::Started),
            JammerCommand::Stop => {
                self.stop();
                Ok(CommandOutcome::Done)
            }
            JammerCommand::Pause => self.pause().map(|()| CommandOutcome::Done),
            JammerCommand::Resume => self.resume().map(CommandOutcome::Resumed),
            JammerCommand::CycleMode => Ok(CommandOutcome::Mode(self.cycle_mode())),
            JammerCommand::Restart => Ok(CommandOutcome::Started(self.restart())),
            JammerCommand::ForceRestart => Ok(CommandOutcome::Started(self.force_restart())),
            JammerCommand::SetMaxPower => Ok(CommandOutcome::Power(self.set_max_power())),
            JammerCommand::CyclePowerLevel => Ok(CommandOutcome::Power(self.cycle_power_level())),
            JammerCommand::TurboBoost => Ok(CommandOutcome::Power(self.turbo_boost())),
            JammerCommand::RetryRadio(slot) => self
                .retry_radio(slot)
                .map(|()| CommandOutcome::RetryQueued(slot)),
            JammerCommand::SelfTest => self.self_test().map(CommandOutcome::SelfTest),
        }
    }

    // =========================================================================
    // Scheduler tick
    // =========================================================================

    /// One cooperative scheduler step
    ///
    /// Does nothing unless transmitting. Order: advisory voltage check,
    /// queued retries, power ramp, channel hop, periodic status report.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.session.is_transmitting() {
            return report;
        }

        let now = self.clock.now();
        if let Some(sample) = self.supervisor.advisory_check(&mut self.session, now) {
            report.voltage = Some(sample);
            if sample.band == VoltageBand::Critical {
                match self.config.critical_policy {
                    CriticalVoltagePolicy::Advisory => {}
                    CriticalVoltagePolicy::ShedRadio => report.shed = self.shed_radio(),
                    CriticalVoltagePolicy::Stop => {
                        error!("critical supply, stopping jammer");
                        self.stop();
                        report.stopped = true;
                        return report;
                    }
                }
            }
        }

        if !self.lifecycle.pending_retries().is_empty() {
            report.retries = self.service_retries();
        }

        let now = self.clock.now();
        report.power_step = self
            .ramp
            .tick(&mut self.session, self.lifecycle.radios_mut(), now);
        report.hop = self
            .hop
            .tick(&mut self.session, self.lifecycle.radios_mut(), now);

        if now.saturating_since(self.session.last_status_report) > self.config.status_interval {
            self.session.last_status_report = now;
            self.report_status();
            report.status_reported = true;
        }

        report
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn invalid(&self, command: JammerCommand) -> TransitionError {
        let error = TransitionError::InvalidState {
            command: command.name(),
            from: self.session.activity,
        };
        warn!("{}", error);
        error
    }

    /// Shared start sequence behind `start`, `restart` and friends
    fn activate(&mut self) -> BringUpReport {
        let supply = self.supervisor.sample();
        info!("pre-start supply {}", supply);

        self.lifecycle.cancel_retries();
        reset_bus(
            &mut self.bus,
            self.lifecycle.radios_mut(),
            &mut self.clock,
            &self.config.start_reset,
        );
        self.bus.power_down_shared_peripheral();
        self.clock.sleep(self.config.shared_peripheral_settle);

        let now = self.clock.now();
        self.session.activity = Activity::Active;
        self.session.clear_faults();
        self.session.reset_ramp(now);
        info!("jammer activating in {} mode", self.session.mode);

        let report = self.lifecycle.bring_up_all(
            self.session.power_level,
            &mut self.supervisor,
            &mut self.clock,
            &mut self.cancel,
        );
        self.record_bring_up(&report);

        for radio in self.lifecycle.radios_mut().iter_mut() {
            if radio.is_active() && radio.is_connected() && radio.start_carrier().is_err() {
                warn!("{}: failed to start carrier", radio.slot());
            }
        }

        report
    }

    fn record_bring_up(&mut self, report: &BringUpReport) {
        for slot in RadioSlot::ALL {
            if let SlotOutcome::Attempted(BringUpOutcome::Failed { .. }) = report.outcome(slot) {
                self.session.record_fault(Fault::ConnectFailed(slot));
            }
        }
        if report.was_cancelled() {
            self.session.record_fault(Fault::BringUpCancelled);
        }

        if report.all_failed() {
            self.session.consecutive_failed_starts =
                self.session.consecutive_failed_starts.saturating_add(1);
            self.session.record_fault(Fault::AllRadiosFailed);
            error!(
                "no radios active after start ({} in a row), check wiring and supply",
                self.session.consecutive_failed_starts
            );
        } else {
            self.session.consecutive_failed_starts = 0;
            info!("{} radios transmitting", report.active_count());
        }
    }

    fn service_retries(&mut self) -> Vec<(RadioSlot, SlotOutcome), RADIO_COUNT> {
        let results = self.lifecycle.service_retries(
            self.session.power_level,
            &mut self.supervisor,
            &mut self.clock,
            &mut self.cancel,
        );

        for (slot, outcome) in &results {
            match outcome {
                SlotOutcome::Attempted(BringUpOutcome::Connected { .. }) => {
                    self.session.consecutive_failed_starts = 0;
                    let channel = self.lifecycle.radio(*slot).channel();
                    debug!("{}: back on {}", slot, channel);
                }
                SlotOutcome::Attempted(BringUpOutcome::Failed { .. }) => {
                    self.session.record_fault(Fault::ConnectFailed(*slot));
                }
                _ => {}
            }
        }
        results
    }

    /// Power down the highest-numbered active radio
    fn shed_radio(&mut self) -> Option<RadioSlot> {
        let radio = self
            .lifecycle
            .radios_mut()
            .iter_mut()
            .rev()
            .find(|r| r.is_active())?;
        let slot = radio.slot();
        if radio.stop_carrier().is_err() || radio.power_down().is_err() {
            warn!("{}: shed did not complete cleanly", slot);
        }
        radio.mark_inactive();
        error!("critical supply, shed {}", slot);
        Some(slot)
    }

    fn halt_carriers(&mut self) {
        for radio in self.lifecycle.radios_mut().iter_mut().filter(|r| r.is_active()) {
            if radio.stop_carrier().is_err() {
                warn!("{}: stop carrier failed", radio.slot());
            }
        }
    }

    fn report_status(&mut self) {
        for radio in self.lifecycle.radios_mut().iter_mut() {
            if radio.is_active() && radio.is_connected() {
                info!("{}: active and connected", radio.slot());
            } else {
                info!("{}: inactive or disconnected", radio.slot());
            }
        }
        info!(
            "mode {} power {} at {}",
            self.session.mode,
            self.session.power_level,
            self.clock.now()
        );
    }
}
