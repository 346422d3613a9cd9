//! Decoded GPS fields, each tagged with the age of its last successful decode.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use heapless::String;
use nmea::{Nmea, SentenceType};

/// Longest sentence NMEA 0183 allows, including `$` and checksum.
pub const SENTENCE_MAX: usize = 82;

/// A decoded value and how long ago it was decoded.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Field<T> {
    pub value: T,
    pub age_ms: u64,
}

impl<T> Field<T> {
    pub fn fresher_than(&self, max_age_ms: u64) -> bool {
        self.age_ms < max_age_ms
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

/// Read side of the receiver. Every accessor returns `None` while the field
/// is invalid (never decoded, or the receiver reported it void).
pub trait GpsFieldSource {
    /// Feed one byte of the receiver's character stream.
    fn push_byte(&mut self, byte: u8, now_ms: u64);

    /// UTC date and time of day, as transmitted.
    fn utc(&self, now_ms: u64) -> Option<Field<NaiveDateTime>>;

    fn position(&self, now_ms: u64) -> Option<Field<Position>>;

    fn satellites(&self, now_ms: u64) -> Option<Field<u8>>;

    fn speed_knots(&self, now_ms: u64) -> Option<Field<f32>>;

    fn course_deg(&self, now_ms: u64) -> Option<Field<f32>>;
}

#[derive(Copy, Clone, Debug, Default)]
struct Stamps {
    utc: Option<u64>,
    position: Option<u64>,
    satellites: Option<u64>,
    motion: Option<u64>,
}

/// [`GpsFieldSource`] over the `nmea` crate's sentence parser.
pub struct NmeaFieldSource {
    nmea: Nmea,
    line: String<SENTENCE_MAX>,
    stamps: Stamps,
    parse_errors: u32,
}

impl Default for NmeaFieldSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NmeaFieldSource {
    pub fn new() -> Self {
        Self {
            nmea: Nmea::default(),
            line: String::new(),
            stamps: Stamps::default(),
            parse_errors: 0,
        }
    }

    /// Sentences dropped for bad checksums, unsupported types or overflow.
    pub fn parse_errors(&self) -> u32 {
        self.parse_errors
    }

    fn finish_line(&mut self, now_ms: u64) {
        let parsed = self.nmea.parse(self.line.as_str()).map_err(|_| ());
        self.line.clear();
        let Ok(kind) = parsed else {
            self.parse_errors = self.parse_errors.wrapping_add(1);
            return;
        };

        match kind {
            SentenceType::RMC => {
                if self.nmea.fix_time.is_some() && self.nmea.fix_date.is_some() {
                    self.stamps.utc = Some(now_ms);
                }
                if self.nmea.latitude.is_some() && self.nmea.longitude.is_some() {
                    self.stamps.position = Some(now_ms);
                }
                if self.nmea.speed_over_ground.is_some() {
                    self.stamps.motion = Some(now_ms);
                }
            }
            SentenceType::GGA => {
                if self.nmea.latitude.is_some() && self.nmea.longitude.is_some() {
                    self.stamps.position = Some(now_ms);
                }
                if self.nmea.num_of_fix_satellites.is_some() {
                    self.stamps.satellites = Some(now_ms);
                }
            }
            _ => {}
        }
    }

    fn field<T>(stamp: Option<u64>, value: Option<T>, now_ms: u64) -> Option<Field<T>> {
        let value = value?;
        let stamp = stamp?;
        Some(Field {
            value,
            age_ms: now_ms.saturating_sub(stamp),
        })
    }
}

impl GpsFieldSource for NmeaFieldSource {
    fn push_byte(&mut self, byte: u8, now_ms: u64) {
        match byte {
            b'\n' => self.finish_line(now_ms),
            b'\r' => {}
            b'$' => {
                // A new sentence always starts over, even mid-line.
                self.line.clear();
                let _ = self.line.push('$');
            }
            _ => {
                if self.line.push(byte as char).is_err() {
                    self.line.clear();
                    self.parse_errors = self.parse_errors.wrapping_add(1);
                }
            }
        }
    }

    fn utc(&self, now_ms: u64) -> Option<Field<NaiveDateTime>> {
        let date: Option<NaiveDate> = self.nmea.fix_date;
        let time: Option<NaiveTime> = self.nmea.fix_time;
        let at = date.zip(time).map(|(d, t)| NaiveDateTime::new(d, t));
        Self::field(self.stamps.utc, at, now_ms)
    }

    fn position(&self, now_ms: u64) -> Option<Field<Position>> {
        let pos = self
            .nmea
            .latitude
            .zip(self.nmea.longitude)
            .map(|(lat, lon)| Position { lat, lon });
        Self::field(self.stamps.position, pos, now_ms)
    }

    fn satellites(&self, now_ms: u64) -> Option<Field<u8>> {
        let sats = self.nmea.num_of_fix_satellites.map(|n| n.min(u8::MAX as u32) as u8);
        Self::field(self.stamps.satellites, sats, now_ms)
    }

    fn speed_knots(&self, now_ms: u64) -> Option<Field<f32>> {
        Self::field(self.stamps.motion, self.nmea.speed_over_ground, now_ms)
    }

    fn course_deg(&self, now_ms: u64) -> Option<Field<f32>> {
        Self::field(self.stamps.motion, self.nmea.true_course, now_ms)
    }
}

/// XOR of every byte between `$` and `*`.
pub fn nmea_checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n";
    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    fn feed(src: &mut NmeaFieldSource, text: &str, now_ms: u64) {
        for b in text.bytes() {
            src.push_byte(b, now_ms);
        }
    }

    #[test]
    fn checksum_matches_reference_sentences() {
        assert_eq!(
            nmea_checksum("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W"),
            0x6A
        );
        assert_eq!(
            nmea_checksum("GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,"),
            0x47
        );
    }

    #[test]
    fn fields_are_invalid_before_any_sentence() {
        let src = NmeaFieldSource::new();
        assert!(src.utc(0).is_none());
        assert!(src.position(0).is_none());
        assert!(src.satellites(0).is_none());
    }

    #[test]
    fn rmc_sets_time_and_position_with_age() {
        let mut src = NmeaFieldSource::new();
        feed(&mut src, RMC, 1_000);

        let utc = src.utc(1_250).unwrap();
        assert_eq!(utc.age_ms, 250);
        assert_eq!(
            utc.value,
            NaiveDate::from_ymd_opt(1994, 3, 23)
                .unwrap()
                .and_hms_opt(12, 35, 19)
                .unwrap()
        );

        let pos = src.position(1_000).unwrap().value;
        assert!((pos.lat - 48.1173).abs() < 1e-3);
        assert!((pos.lon - 11.5167).abs() < 1e-3);
        assert!(src.speed_knots(1_000).is_some());
    }

    #[test]
    fn gga_sets_satellite_count() {
        let mut src = NmeaFieldSource::new();
        feed(&mut src, GGA, 500);
        assert_eq!(src.satellites(700).map(|f| f.value), Some(8));
    }

    #[test]
    fn corrupted_sentence_counts_as_parse_error() {
        let mut src = NmeaFieldSource::new();
        feed(
            &mut src,
            "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*00\r\n",
            0,
        );
        assert_eq!(src.parse_errors(), 1);
        assert!(src.utc(0).is_none());
    }

    #[test]
    fn overlong_line_is_discarded() {
        let mut src = NmeaFieldSource::new();
        let junk = [b'x'; SENTENCE_MAX + 4];
        for b in junk {
            src.push_byte(b, 0);
        }
        assert!(src.parse_errors() >= 1);
        feed(&mut src, RMC, 0);
        assert!(src.utc(0).is_some());
    }
}
