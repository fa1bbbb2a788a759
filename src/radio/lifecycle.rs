//! Radio Lifecycle Management
//!
//! Brings transceivers from powered-down to transmitting with bounded
//! retries, staged one radio at a time with the supply re-checked between
//! stages.

use core::time::Duration;

use heapless::Vec;

use crate::config::RADIO_COUNT;
use crate::platform::{CancelCheck, Clock, Transceiver, VoltageSensor};
use crate::power::{PowerSupervisor, VoltageBand};
use crate::radio::handle::RadioHandle;
use crate::types::{Channel, PowerLevel, RadioSlot};

/// Bounded retry policy for one radio
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (each attempt calls `begin` at most once)
    pub max_attempts: u8,
    /// Sleep between failed attempts
    pub retry_delay: Duration,
}

/// Result of bringing up one radio
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BringUpOutcome {
    /// Radio configured and transmitting
    Connected {
        /// Attempts used, including the successful one
        attempts: u8,
    },
    /// Attempt cap exhausted
    Failed {
        /// Attempts used
        attempts: u8,
    },
    /// Cancel source fired between attempts
    Cancelled {
        /// Attempts completed before the abort
        attempts: u8,
    },
}

impl BringUpOutcome {
    /// Radio came up
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Attempts consumed
    #[must_use]
    pub const fn attempts(self) -> u8 {
        match self {
            Self::Connected { attempts }
            | Self::Failed { attempts }
            | Self::Cancelled { attempts } => attempts,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BringUpOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Connected { attempts } => defmt::write!(f, "connected after {}", attempts),
            Self::Failed { attempts } => defmt::write!(f, "failed after {}", attempts),
            Self::Cancelled { attempts } => defmt::write!(f, "cancelled after {}", attempts),
        }
    }
}

/// Per-slot result of a staged bring-up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SlotOutcome {
    /// The sequence ended before this slot (cancelled)
    #[default]
    NotAttempted,
    /// Skipped because the supply left the nominal band
    SkippedLowVoltage(VoltageBand),
    /// Bring-up ran
    Attempted(BringUpOutcome),
}

impl SlotOutcome {
    /// Slot ended up transmitting
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Attempted(BringUpOutcome::Connected { .. }))
    }
}

/// Summary of one staged bring-up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BringUpReport {
    outcomes: [SlotOutcome; RADIO_COUNT],
    cancelled: bool,
}

impl BringUpReport {
    /// Outcome for one slot
    #[must_use]
    pub const fn outcome(&self, slot: RadioSlot) -> SlotOutcome {
        self.outcomes[slot.index()]
    }

    /// Number of radios that came up
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_connected()).count()
    }

    /// Zero radios came up
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.active_count() == 0
    }

    /// Sequence was aborted by the cancel source
    #[must_use]
    pub const fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Supply gate stopped the sequence early
    #[must_use]
    pub fn stopped_on_voltage(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, SlotOutcome::SkippedLowVoltage(_)))
    }
}

/// Bring one radio up with bounded retries
///
/// Each attempt either reconfigures a radio that already answers, or calls
/// `begin` once and re-probes. `cancel` is polled before every attempt after
/// the first; the sleep between attempts is skipped after the last one.
pub fn bring_up<T, C, K>(
    handle: &mut RadioHandle<T>,
    channels: &[Channel],
    level: PowerLevel,
    policy: &RetryPolicy,
    clock: &mut C,
    cancel: &mut K,
) -> BringUpOutcome
where
    T: Transceiver,
    C: Clock,
    K: CancelCheck,
{
    let slot = handle.slot();
    handle.mark_inactive();

    let mut attempts: u8 = 0;
    while attempts < policy.max_attempts {
        if attempts > 0 && cancel.cancel_requested() {
            warn!("{}: bring-up cancelled after {} attempts", slot, attempts);
            return BringUpOutcome::Cancelled { attempts };
        }
        attempts += 1;
        debug!("{}: bring-up attempt {}", slot, attempts);

        let connected = if handle.is_connected() {
            debug!("{}: already connected, reconfiguring", slot);
            true
        } else if handle.begin().is_ok() {
            let probed = handle.is_connected();
            if !probed {
                debug!("{}: begin ok but chip not answering", slot);
            }
            probed
        } else {
            debug!("{}: begin failed", slot);
            false
        };

        if connected {
            if handle.configure_for_carrier(channels, level).is_ok() {
                info!("{}: transmitting after {} attempts", slot, attempts);
                return BringUpOutcome::Connected { attempts };
            }
            warn!("{}: configuration failed on attempt {}", slot, attempts);
            handle.mark_inactive();
        }

        if attempts < policy.max_attempts {
            clock.sleep(policy.retry_delay);
        }
    }

    error!("{}: failed to initialize after {} attempts", slot, attempts);
    BringUpOutcome::Failed { attempts }
}

/// Owns the three radio handles and sequences their bring-up
pub struct LifecycleManager<T> {
    radios: [RadioHandle<T>; RADIO_COUNT],
    policy: RetryPolicy,
    stagger_delay: Duration,
    power_cycle_delay: Duration,
    pending_retries: Vec<RadioSlot, RADIO_COUNT>,
}

impl<T: Transceiver> LifecycleManager<T> {
    /// Take ownership of the three transceivers in slot order
    pub fn new(
        devices: [T; RADIO_COUNT],
        policy: RetryPolicy,
        stagger_delay: Duration,
        power_cycle_delay: Duration,
    ) -> Self {
        let [one, two, three] = devices;
        Self {
            radios: [
                RadioHandle::new(RadioSlot::One, one),
                RadioHandle::new(RadioSlot::Two, two),
                RadioHandle::new(RadioSlot::Three, three),
            ],
            policy,
            stagger_delay,
            power_cycle_delay,
            pending_retries: Vec::new(),
        }
    }

    /// Staged bring-up of every radio
    ///
    /// All radios are power-cycled first. Radio 1 always runs; each later
    /// radio runs only if, after the stagger delay, the supply still reads
    /// nominal. The first non-nominal reading skips every remaining slot.
    pub fn bring_up_all<S, C, K>(
        &mut self,
        level: PowerLevel,
        supervisor: &mut PowerSupervisor<S>,
        clock: &mut C,
        cancel: &mut K,
    ) -> BringUpReport
    where
        S: VoltageSensor,
        C: Clock,
        K: CancelCheck,
    {
        let mut report = BringUpReport::default();
        self.pending_retries.clear();

        self.clear_active_flags();
        self.power_down_all();
        clock.sleep(self.power_cycle_delay);

        for (index, slot) in RadioSlot::ALL.into_iter().enumerate() {
            if index > 0 {
                clock.sleep(self.stagger_delay);

                let sample = supervisor.sample();
                if !sample.band.is_nominal() {
                    warn!(
                        "supply {} after stage {}, skipping remaining radios",
                        sample, index
                    );
                    for outcome in &mut report.outcomes[index..] {
                        *outcome = SlotOutcome::SkippedLowVoltage(sample.band);
                    }
                    break;
                }

                if cancel.cancel_requested() {
                    warn!("bring-up cancelled before {}", slot);
                    report.cancelled = true;
                    break;
                }
            }

            info!("starting {}", slot);
            let outcome = bring_up(
                &mut self.radios[index],
                slot.startup_channels(),
                level,
                &self.policy,
                clock,
                cancel,
            );
            report.outcomes[index] = SlotOutcome::Attempted(outcome);

            if matches!(outcome, BringUpOutcome::Cancelled { .. }) {
                report.cancelled = true;
                break;
            }
        }

        info!(
            "radios active: {} {} {}",
            self.radios[0].is_active(),
            self.radios[1].is_active(),
            self.radios[2].is_active()
        );
        report
    }

    /// Queue a single-radio bring-up for the next lifecycle stage
    ///
    /// Returns false if the slot is already queued.
    pub fn request_retry(&mut self, slot: RadioSlot) -> bool {
        if self.pending_retries.contains(&slot) {
            return false;
        }
        // Capacity equals the slot count, so a new slot always fits
        self.pending_retries.push(slot).is_ok()
    }

    /// Slots waiting for a retry
    #[must_use]
    pub fn pending_retries(&self) -> &[RadioSlot] {
        &self.pending_retries
    }

    /// Run every queued retry
    ///
    /// The supply is sampled before each one; a non-nominal reading drops
    /// the remaining queue.
    pub fn service_retries<S, C, K>(
        &mut self,
        level: PowerLevel,
        supervisor: &mut PowerSupervisor<S>,
        clock: &mut C,
        cancel: &mut K,
    ) -> Vec<(RadioSlot, SlotOutcome), RADIO_COUNT>
    where
        S: VoltageSensor,
        C: Clock,
        K: CancelCheck,
    {
        let mut results = Vec::new();
        let queued = core::mem::take(&mut self.pending_retries);

        for slot in queued {
            let sample = supervisor.sample();
            let outcome = if sample.band.is_nominal() {
                info!("retrying {}", slot);
                let handle = &mut self.radios[slot.index()];
                SlotOutcome::Attempted(bring_up(
                    handle,
                    slot.startup_channels(),
                    level,
                    &self.policy,
                    clock,
                    cancel,
                ))
            } else {
                warn!("supply {}, dropping retry of {}", sample, slot);
                SlotOutcome::SkippedLowVoltage(sample.band)
            };
            let _ = results.push((slot, outcome));
        }

        results
    }

    /// Forget queued retries
    pub fn cancel_retries(&mut self) {
        self.pending_retries.clear();
    }

    /// Put every radio into power-down
    pub fn power_down_all(&mut self) {
        for radio in &mut self.radios {
            if radio.power_down().is_err() {
                warn!("{}: power down failed", radio.slot());
            }
        }
    }

    /// Clear every active flag
    pub fn clear_active_flags(&mut self) {
        for radio in &mut self.radios {
            radio.mark_inactive();
        }
    }

    /// Handle for one slot
    #[must_use]
    pub fn radio(&self, slot: RadioSlot) -> &RadioHandle<T> {
        &self.radios[slot.index()]
    }

    /// Mutable handle for one slot
    pub fn radio_mut(&mut self, slot: RadioSlot) -> &mut RadioHandle<T> {
        &mut self.radios[slot.index()]
    }

    /// All handles in slot order, mutable
    pub fn radios_mut(&mut self) -> &mut [RadioHandle<T>; RADIO_COUNT] {
        &mut self.radios
    }

    /// Number of radios flagged active
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.radios.iter().filter(|r| r.is_active()).count()
    }

    /// At least one radio is flagged active
    #[must_use]
    pub fn any_active(&self) -> bool {
        self.radios.iter().any(RadioHandle::is_active)
    }
}
