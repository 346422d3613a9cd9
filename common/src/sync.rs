//! Transfer of GPS time into the [`TimeBase`].

use crate::gps::GpsFieldSource;
use crate::time::{Instant, TimeBase};

/// Oldest decode the synchronizer will apply. Anything older is a replay of a
/// sentence from a previous second.
pub const MAX_FIELD_AGE_MS: u64 = 1000;

/// When a sync attempt may go ahead.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Only on the cycle where the pulse fired.
    PulseGated,
    /// Every cycle. For receivers without a pulse line.
    Unconditional,
    /// Only when never synced, or at least `min_interval_secs` since the
    /// last sync. No pulse involved.
    Interval { min_interval_secs: i64 },
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejected {
    NoPulse,
    TooSoon,
    TimeInvalid,
    TimeStale { age_ms: u64 },
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Written only by a successful [`Synchronizer::try_discipline`].
    pub last_sync: Option<Instant>,
    /// Copy of what the last poll cycle took from the [`PulseFlag`], kept for
    /// inspection. The latch itself is the flag; this field never gates a sync.
    ///
    /// [`PulseFlag`]: crate::pulse::PulseFlag
    pub pending_pulse: bool,
}

#[derive(Clone, Debug)]
pub struct Synchronizer {
    policy: SyncPolicy,
    state: SyncState,
}

impl Synchronizer {
    pub const fn new(policy: SyncPolicy) -> Self {
        Self {
            policy,
            state: SyncState {
                last_sync: None,
                pending_pulse: false,
            },
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_sync(&self) -> Option<Instant> {
        self.state.last_sync
    }

    /// Apply the receiver's time to `time_base` if policy and freshness allow.
    ///
    /// The decoded second is the one in which the sentence *started*; by the
    /// time it has been received and parsed that second is over, so the
    /// applied instant is the decoded one plus one second. With the pulse
    /// gate this lands on the edge that opens the next second.
    pub fn try_discipline<G: GpsFieldSource>(
        &mut self,
        pulse_fired: bool,
        gps: &G,
        time_base: &mut TimeBase,
        now_ms: u64,
    ) -> Option<Instant> {
        self.state.pending_pulse = pulse_fired;
        match self.check(pulse_fired, gps, time_base, now_ms) {
            Ok(candidate) => {
                time_base.set(candidate, now_ms);
                self.state.last_sync = Some(candidate);
                debug!("sync applied at {}", candidate.secs());
                Some(candidate)
            }
            Err(reason) => {
                trace!("sync skipped: {:?}", reason);
                None
            }
        }
    }

    fn check<G: GpsFieldSource>(
        &self,
        pulse_fired: bool,
        gps: &G,
        time_base: &TimeBase,
        now_ms: u64,
    ) -> Result<Instant, Rejected> {
        match self.policy {
            SyncPolicy::PulseGated if !pulse_fired => return Err(Rejected::NoPulse),
            SyncPolicy::Interval { min_interval_secs } => {
                if let (Some(last), Some(now)) = (self.state.last_sync, time_base.now(now_ms)) {
                    if now - last < min_interval_secs {
                        return Err(Rejected::TooSoon);
                    }
                }
            }
            _ => {}
        }

        let utc = gps.utc(now_ms).ok_or(Rejected::TimeInvalid)?;
        if !utc.fresher_than(MAX_FIELD_AGE_MS) {
            return Err(Rejected::TimeStale { age_ms: utc.age_ms });
        }
        Ok(Instant::from_naive(utc.value) + 1)
    }
}
