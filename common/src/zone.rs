//! UTC to local civil time under a pair of daylight-saving rules.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::time::Instant;

/// Which occurrence of the weekday within the month.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Week {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

/// When a rule takes effect: e.g. the second Sunday of March at 02:00.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub week: Week,
    pub weekday: Weekday,
    /// 1 = January.
    pub month: u32,
    /// Local hour, read on the clock of the rule being left.
    pub hour: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZoneRule {
    pub abbreviation: &'static str,
    pub transition: Transition,
    pub utc_offset_minutes: i32,
}

impl ZoneRule {
    pub const fn offset_secs(&self) -> i64 {
        self.utc_offset_minutes as i64 * 60
    }
}

/// A daylight rule and a standard rule. A zone without daylight saving uses
/// the same rule twice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZonePair {
    pub daylight: ZoneRule,
    pub standard: ZoneRule,
}

impl ZonePair {
    pub const fn new(daylight: ZoneRule, standard: ZoneRule) -> Self {
        Self { daylight, standard }
    }

    pub const fn fixed(rule: ZoneRule) -> Self {
        Self {
            daylight: rule,
            standard: rule,
        }
    }

    /// Local wall-clock instant for `utc`, and the rule in force.
    pub fn to_local(&self, utc: Instant) -> (Instant, ZoneRule) {
        let rule = self.active_rule(utc);
        (utc + rule.offset_secs(), rule)
    }

    /// As [`Self::to_local`], passing an unset clock straight through.
    pub fn to_local_opt(&self, utc: Option<Instant>) -> Option<(Instant, ZoneRule)> {
        utc.map(|at| self.to_local(at))
    }

    pub fn active_rule(&self, utc: Instant) -> ZoneRule {
        if self.is_daylight(utc) {
            self.daylight
        } else {
            self.standard
        }
    }

    pub fn is_daylight(&self, utc: Instant) -> bool {
        if self.daylight.transition == self.standard.transition {
            return false;
        }
        let year = utc.to_naive().year();
        let (Some(dst_start), Some(std_start)) = (
            transition_utc(&self.daylight, &self.standard, year),
            transition_utc(&self.standard, &self.daylight, year),
        ) else {
            return false;
        };

        if dst_start < std_start {
            // Northern hemisphere: daylight saving sits inside the year.
            utc >= dst_start && utc < std_start
        } else {
            // Southern hemisphere: daylight saving wraps the new year.
            !(utc >= std_start && utc < dst_start)
        }
    }

    /// UTC instants at which daylight and standard time begin in `year`.
    pub fn transitions(&self, year: i32) -> Option<(Instant, Instant)> {
        Some((
            transition_utc(&self.daylight, &self.standard, year)?,
            transition_utc(&self.standard, &self.daylight, year)?,
        ))
    }
}

/// The UTC instant `rule` takes over from `prior` in `year`.
fn transition_utc(rule: &ZoneRule, prior: &ZoneRule, year: i32) -> Option<Instant> {
    let t = rule.transition;
    let date = transition_date(year, t.month, t.weekday, t.week)?;
    let local = date.and_hms_opt(t.hour, 0, 0)?;
    Some(Instant::from_naive(local) - prior.offset_secs())
}

fn transition_date(year: i32, month: u32, weekday: Weekday, week: Week) -> Option<NaiveDate> {
    let n = match week {
        Week::First => 1,
        Week::Second => 2,
        Week::Third => 3,
        Week::Fourth => 4,
        Week::Last => {
            let (next_year, next_month) = if month == 12 {
                (year + 1, 1)
            } else {
                (year, month + 1)
            };
            let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)? - Duration::days(1);
            let back = (7 + last_day.weekday().num_days_from_sunday()
                - weekday.num_days_from_sunday())
                % 7;
            return Some(last_day - Duration::days(back as i64));
        }
    };
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

pub mod presets {
    use chrono::Weekday;

    use super::{Transition, Week, ZonePair, ZoneRule};

    const fn rule(
        abbreviation: &'static str,
        week: Week,
        weekday: Weekday,
        month: u32,
        hour: u32,
        utc_offset_minutes: i32,
    ) -> ZoneRule {
        ZoneRule {
            abbreviation,
            transition: Transition {
                week,
                weekday,
                month,
                hour,
            },
            utc_offset_minutes,
        }
    }

    pub const UTC: ZonePair = ZonePair::fixed(rule("UTC", Week::Last, Weekday::Sun, 3, 1, 0));

    pub const US_EASTERN: ZonePair = ZonePair::new(
        rule("EDT", Week::Second, Weekday::Sun, 3, 2, -240),
        rule("EST", Week::First, Weekday::Sun, 11, 2, -300),
    );

    pub const US_CENTRAL: ZonePair = ZonePair::new(
        rule("CDT", Week::Second, Weekday::Sun, 3, 2, -300),
        rule("CST", Week::First, Weekday::Sun, 11, 2, -360),
    );

    pub const US_MOUNTAIN: ZonePair = ZonePair::new(
        rule("MDT", Week::Second, Weekday::Sun, 3, 2, -360),
        rule("MST", Week::First, Weekday::Sun, 11, 2, -420),
    );

    pub const US_PACIFIC: ZonePair = ZonePair::new(
        rule("PDT", Week::Second, Weekday::Sun, 3, 2, -420),
        rule("PST", Week::First, Weekday::Sun, 11, 2, -480),
    );

    pub const UK: ZonePair = ZonePair::new(
        rule("BST", Week::Last, Weekday::Sun, 3, 1, 60),
        rule("GMT", Week::Last, Weekday::Sun, 10, 2, 0),
    );

    pub const CENTRAL_EUROPE: ZonePair = ZonePair::new(
        rule("CEST", Week::Last, Weekday::Sun, 3, 2, 120),
        rule("CET", Week::Last, Weekday::Sun, 10, 3, 60),
    );

    pub const AUSTRALIA_EASTERN: ZonePair = ZonePair::new(
        rule("AEDT", Week::First, Weekday::Sun, 10, 2, 660),
        rule("AEST", Week::First, Weekday::Sun, 4, 3, 600),
    );
}
