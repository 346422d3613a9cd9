use core::ops::{Add, Sub};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Whole seconds since the Unix epoch.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(i64);

impl Instant {
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn secs(self) -> i64 {
        self.0
    }

    /// Build an instant from a decoded GPS date and time of day.
    /// Sub-second parts of `time` are dropped.
    pub fn from_date_time(date: NaiveDate, time: NaiveTime) -> Self {
        Self::from_naive(NaiveDateTime::new(date, time))
    }

    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self(dt.and_utc().timestamp())
    }

    /// Calendar view of this instant. Local instants are offset seconds, so the
    /// result is the wall-clock reading of whatever zone produced them.
    pub fn to_naive(self) -> NaiveDateTime {
        DateTime::from_timestamp(self.0, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    }
}

impl Add<i64> for Instant {
    type Output = Instant;

    fn add(self, secs: i64) -> Instant {
        Instant(self.0.saturating_add(secs))
    }
}

impl Sub<i64> for Instant {
    type Output = Instant;

    fn sub(self, secs: i64) -> Instant {
        Instant(self.0.saturating_sub(secs))
    }
}

impl Sub for Instant {
    type Output = i64;

    fn sub(self, other: Instant) -> i64 {
        self.0.saturating_sub(other.0)
    }
}

/// The system clock. Holds the instant last applied by the synchronizer and the
/// millisecond tick at which it was applied; whole seconds elapse from there.
#[derive(Clone, Debug, Default)]
pub struct TimeBase {
    anchor: Option<(Instant, u64)>,
}

impl TimeBase {
    pub const fn new() -> Self {
        Self { anchor: None }
    }

    /// Current UTC instant, or `None` until the first successful sync.
    pub fn now(&self, now_ms: u64) -> Option<Instant> {
        let (at, set_ms) = self.anchor?;
        let elapsed = now_ms.saturating_sub(set_ms) / 1000;
        Some(at + elapsed as i64)
    }

    pub fn is_set(&self) -> bool {
        self.anchor.is_some()
    }

    pub(crate) fn set(&mut self, at: Instant, now_ms: u64) {
        self.anchor = Some((at, now_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_round_trips_calendar_fields() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let time = NaiveTime::from_hms_opt(14, 3, 9).unwrap();
        let at = Instant::from_date_time(date, time);
        assert_eq!(at.secs(), 1_792_245_789);
        assert_eq!(at.to_naive(), NaiveDateTime::new(date, time));
    }

    #[test]
    fn time_base_is_unset_until_applied() {
        let base = TimeBase::new();
        assert!(!base.is_set());
        assert_eq!(base.now(5_000), None);
    }

    #[test]
    fn time_base_advances_in_whole_seconds() {
        let mut base = TimeBase::new();
        base.set(Instant::from_secs(1_000), 10_000);
        assert_eq!(base.now(10_000), Some(Instant::from_secs(1_000)));
        assert_eq!(base.now(10_999), Some(Instant::from_secs(1_000)));
        assert_eq!(base.now(11_000), Some(Instant::from_secs(1_001)));
        assert_eq!(base.now(70_500), Some(Instant::from_secs(1_060)));
    }

    #[test]
    fn time_base_ignores_ticks_from_before_the_anchor() {
        let mut base = TimeBase::new();
        base.set(Instant::from_secs(500), 2_000);
        assert_eq!(base.now(1_000), Some(Instant::from_secs(500)));
    }
}
