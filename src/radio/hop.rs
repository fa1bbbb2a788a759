//! Channel Hopping
//!
//! Picks a channel uniformly from the current mode's set and retunes every
//! active radio to it at once.

use core::time::Duration;

use rand_core::{RngCore, SeedableRng};
use rand_wyrand::WyRand;

use crate::platform::Transceiver;
use crate::radio::handle::RadioHandle;
use crate::radio::session::JammerSession;
use crate::types::{Channel, JammingMode, Timestamp};

/// Channel hop scheduler
pub struct ChannelHopScheduler {
    rng: WyRand,
    interval: Duration,
}

impl ChannelHopScheduler {
    /// Create a scheduler hopping once per `interval` (zero hops every tick)
    #[must_use]
    pub fn new(interval: Duration, rng_seed: u64) -> Self {
        Self {
            rng: WyRand::seed_from_u64(rng_seed),
            interval,
        }
    }

    /// Draw a channel from the mode's set
    pub fn pick(&mut self, mode: JammingMode) -> Channel {
        let channels = mode.channels();
        // Multiply-shift maps a 32-bit draw onto 0..len without a modulo loop
        let index = (u64::from(self.rng.next_u32()) * channels.len() as u64) >> 32;
        channels[index as usize]
    }

    /// Hop if due and at least one radio is active
    ///
    /// Returns the channel applied.
    pub fn tick<T: Transceiver>(
        &mut self,
        session: &mut JammerSession,
        radios: &mut [RadioHandle<T>],
        now: Timestamp,
    ) -> Option<Channel> {
        if !radios.iter().any(RadioHandle::is_active) {
            return None;
        }
        if !self.interval.is_zero()
            && now.saturating_since(session.last_channel_change) < self.interval
        {
            return None;
        }

        let channel = self.pick(session.mode);
        session.last_channel_change = now;

        for radio in radios.iter_mut().filter(|r| r.is_active()) {
            if radio.set_channel(channel).is_err() {
                warn!("{}: failed to hop to {}", radio.slot(), channel);
            }
        }

        Some(channel)
    }
}
