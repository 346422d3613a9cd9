//! Text for each on-screen field. Every time-dependent field takes an
//! `Option` and falls back to a placeholder when the clock is unset.

use core::fmt::Write;

use chrono::{Datelike, NaiveDateTime, Timelike};
use heapless::String;

use crate::gps::Position;
use crate::grid;
use crate::screen::{DisplayModes, HourFormat, Screen};
use crate::status::ConfidenceGrade;
use crate::Telemetry;

pub const PLACEHOLDER_TIME: &str = "--:--:--";
pub const ZONE_LABEL_MAX: usize = 5;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const KNOTS_TO_MPH: f32 = 1.150_779;

/// A wall-clock reading and the label of the zone it is in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShownTime {
    pub at: NaiveDateTime,
    pub zone: &'static str,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockView {
    pub screen: Screen,
    pub modes: DisplayModes,
    /// Time in the selected view (local or UTC).
    pub main: Option<ShownTime>,
    pub local: Option<ShownTime>,
    pub utc: Option<ShownTime>,
    /// `None` when never synced: the indicator is hidden, not shown as stale.
    pub grade: Option<ConfidenceGrade>,
    pub grid: String<{ grid::MAX_LEN }>,
    pub telemetry: Telemetry,
}

pub fn time_text(shown: Option<&ShownTime>, format: HourFormat) -> String<8> {
    let mut out = String::new();
    let Some(shown) = shown else {
        let _ = out.push_str(PLACEHOLDER_TIME);
        return out;
    };
    let t = shown.at;
    let hour = match format {
        HourFormat::H24 => t.hour(),
        HourFormat::H12 => match t.hour() % 12 {
            0 => 12,
            h => h,
        },
    };
    let _ = match format {
        HourFormat::H24 => write!(out, "{:02}:{:02}:{:02}", hour, t.minute(), t.second()),
        HourFormat::H12 => write!(out, "{:>2}:{:02}:{:02}", hour, t.minute(), t.second()),
    };
    out
}

pub fn am_pm_text(shown: Option<&ShownTime>, format: HourFormat) -> &'static str {
    match (shown, format) {
        (Some(s), HourFormat::H12) if s.at.hour() < 12 => "AM",
        (Some(_), HourFormat::H12) => "PM",
        _ => "",
    }
}

pub fn zone_text(shown: Option<&ShownTime>) -> &'static str {
    shown.map_or("", |s| s.zone)
}

/// `Sat 17 Oct 2026`, or empty when unset.
pub fn date_text(shown: Option<&ShownTime>) -> String<16> {
    let mut out = String::new();
    if let Some(s) = shown {
        let d = s.at.date();
        let _ = write!(
            out,
            "{} {:2} {} {}",
            WEEKDAYS[d.weekday().num_days_from_monday() as usize],
            d.day(),
            MONTHS[d.month0() as usize],
            d.year()
        );
    }
    out
}

pub fn latitude_text(pos: Option<Position>) -> String<12> {
    coordinate_text(pos.map(|p| p.lat), 'N', 'S')
}

pub fn longitude_text(pos: Option<Position>) -> String<12> {
    coordinate_text(pos.map(|p| p.lon), 'E', 'W')
}

fn coordinate_text(value: Option<f64>, positive: char, negative: char) -> String<12> {
    let mut out = String::new();
    match value {
        Some(v) if v < 0.0 => {
            let _ = write!(out, "{negative} {:9.5}", -v);
        }
        Some(v) => {
            let _ = write!(out, "{positive} {:9.5}", v);
        }
        None => {
            let _ = out.push_str("--");
        }
    }
    out
}

pub fn satellites_text(sats: Option<u8>) -> String<8> {
    let mut out = String::new();
    let _ = match sats {
        Some(n) => write!(out, "Sats {n}"),
        None => write!(out, "Sats --"),
    };
    out
}

pub fn speed_text(knots: Option<f32>) -> String<12> {
    let mut out = String::new();
    let _ = match knots {
        Some(k) => write!(out, "{:.1} mph", k * KNOTS_TO_MPH),
        None => write!(out, "-- mph"),
    };
    out
}

pub fn course_text(deg: Option<f32>) -> String<8> {
    let mut out = String::new();
    let _ = match deg {
        Some(d) => write!(out, "hdg {:03}", d as u32 % 360),
        None => write!(out, "hdg ---"),
    };
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn shown(h: u32, m: u32, s: u32) -> ShownTime {
        ShownTime {
            at: NaiveDate::from_ymd_opt(2026, 10, 17)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap(),
            zone: "EDT",
        }
    }

    #[test]
    fn unset_clock_renders_placeholders_only() {
        assert_eq!(time_text(None, HourFormat::H24).as_str(), PLACEHOLDER_TIME);
        assert_eq!(time_text(None, HourFormat::H12).as_str(), PLACEHOLDER_TIME);
        assert_eq!(am_pm_text(None, HourFormat::H12), "");
        assert_eq!(zone_text(None), "");
        assert_eq!(date_text(None).as_str(), "");
    }

    #[test]
    fn twenty_four_hour_clock() {
        let t = shown(7, 5, 9);
        assert_eq!(time_text(Some(&t), HourFormat::H24).as_str(), "07:05:09");
        assert_eq!(am_pm_text(Some(&t), HourFormat::H24), "");
    }

    #[test]
    fn twelve_hour_clock() {
        let midnight = shown(0, 5, 9);
        assert_eq!(time_text(Some(&midnight), HourFormat::H12).as_str(), "12:05:09");
        assert_eq!(am_pm_text(Some(&midnight), HourFormat::H12), "AM");

        let afternoon = shown(13, 0, 0);
        assert_eq!(time_text(Some(&afternoon), HourFormat::H12).as_str(), " 1:00:00");
        assert_eq!(am_pm_text(Some(&afternoon), HourFormat::H12), "PM");

        let noon = shown(12, 30, 0);
        assert_eq!(time_text(Some(&noon), HourFormat::H12).as_str(), "12:30:00");
        assert_eq!(am_pm_text(Some(&noon), HourFormat::H12), "PM");
    }

    #[test]
    fn date_line() {
        assert_eq!(date_text(Some(&shown(1, 0, 0))).as_str(), "Sat 17 Oct 2026");
    }

    #[test]
    fn coordinates_carry_hemisphere() {
        let pos = Some(Position {
            lat: 41.714,
            lon: -72.727,
        });
        assert_eq!(latitude_text(pos).as_str(), "N  41.71400");
        assert_eq!(longitude_text(pos).as_str(), "W  72.72700");
        assert_eq!(latitude_text(None).as_str(), "--");
    }

    #[test]
    fn telemetry_lines() {
        assert_eq!(satellites_text(Some(9)).as_str(), "Sats 9");
        assert_eq!(satellites_text(None).as_str(), "Sats --");
        assert_eq!(speed_text(Some(10.0)).as_str(), "11.5 mph");
        assert_eq!(course_text(Some(84.4)).as_str(), "hdg 084");
        assert_eq!(course_text(None).as_str(), "hdg ---");
    }
}
