//! A fake receiver for the desktop simulator: wanders around a starting
//! point and emits the RMC and GGA sentences a real one would.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::gps::nmea_checksum;

pub struct ReceiverSimulator {
    rng: fastrand::Rng,
    lat: f64,
    lon: f64,
    satellites: u8,
    speed_knots: f32,
    course_deg: f32,
}

impl Default for ReceiverSimulator {
    fn default() -> Self {
        Self::new(fastrand::u64(..), 41.714, -72.727)
    }
}

impl ReceiverSimulator {
    pub fn new(seed: u64, lat: f64, lon: f64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            lat,
            lon,
            satellites: 8,
            speed_knots: 0.0,
            course_deg: 0.0,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// One second of output: an RMC then a GGA, both stamped `at`.
    pub fn next_second(&mut self, at: DateTime<Utc>) -> [String; 2] {
        self.wander();
        [self.rmc(at), self.gga(at)]
    }

    fn wander(&mut self) {
        self.lat = (self.lat + (self.rng.f64() - 0.5) * 1e-4).clamp(-89.9, 89.9);
        self.lon = (self.lon + (self.rng.f64() - 0.5) * 1e-4).clamp(-179.9, 179.9);
        self.speed_knots = (self.speed_knots + (self.rng.f32() - 0.5) * 2.0).clamp(0.0, 60.0);
        self.course_deg = (self.course_deg + (self.rng.f32() - 0.5) * 20.0).rem_euclid(360.0);
        if self.rng.u8(..10) == 0 {
            self.satellites = self.rng.u8(4..=12);
        }
    }

    fn rmc(&self, at: DateTime<Utc>) -> String {
        let body = format!(
            "GPRMC,{},A,{},{:05.1},{:05.1},{:02}{:02}{:02},000.0,E",
            hms(at),
            coordinates(self.lat, self.lon),
            self.speed_knots,
            self.course_deg,
            at.day(),
            at.month(),
            at.year() % 100,
        );
        sentence(&body)
    }

    fn gga(&self, at: DateTime<Utc>) -> String {
        let body = format!(
            "GPGGA,{},{},1,{:02},0.9,45.0,M,46.9,M,,",
            hms(at),
            coordinates(self.lat, self.lon),
            self.satellites,
        );
        sentence(&body)
    }
}

fn sentence(body: &str) -> String {
    format!("${}*{:02X}\r\n", body, nmea_checksum(body))
}

fn hms(at: DateTime<Utc>) -> String {
    format!("{:02}{:02}{:02}", at.hour(), at.minute(), at.second())
}

/// `ddmm.mmmm,N,dddmm.mmmm,W`
fn coordinates(lat: f64, lon: f64) -> String {
    let (lat_deg, lat_min) = degrees_minutes(lat);
    let (lon_deg, lon_min) = degrees_minutes(lon);
    format!(
        "{:02}{:07.4},{},{:03}{:07.4},{}",
        lat_deg,
        lat_min,
        if lat < 0.0 { 'S' } else { 'N' },
        lon_deg,
        lon_min,
        if lon < 0.0 { 'W' } else { 'E' },
    )
}

/// Whole degrees and minutes, rounded to the four decimals written out so
/// minutes never print as `60.0000`.
fn degrees_minutes(value: f64) -> (u32, f64) {
    const UNITS_PER_DEGREE: u64 = 60 * 10_000;
    let units = (value.abs() * UNITS_PER_DEGREE as f64).round() as u64;
    (
        (units / UNITS_PER_DEGREE) as u32,
        (units % UNITS_PER_DEGREE) as f64 / 10_000.0,
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::gps::{GpsFieldSource, NmeaFieldSource};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 14, 3, 9).unwrap()
    }

    #[test]
    fn sentences_carry_valid_checksums() {
        let mut sim = ReceiverSimulator::new(7, 41.714, -72.727);
        for line in sim.next_second(at()) {
            let line = line.trim_end();
            let (body, sum) = line[1..].split_once('*').unwrap();
            assert_eq!(u8::from_str_radix(sum, 16).unwrap(), nmea_checksum(body));
        }
    }

    #[test]
    fn minutes_carry_into_degrees_when_rounding_up() {
        assert_eq!(degrees_minutes(41.999_999_9), (42, 0.0));
        assert_eq!(
            coordinates(41.999_999_9, -72.999_999_9),
            "4200.0000,N,07300.0000,W"
        );
        assert_eq!(coordinates(48.1173, 11.516_667), "4807.0380,N,01131.0000,E");
    }

    #[test]
    fn output_decodes_to_the_same_second_and_place() {
        let mut sim = ReceiverSimulator::new(7, -33.868, 151.209);
        let mut src = NmeaFieldSource::new();
        for line in sim.next_second(at()) {
            for b in line.bytes() {
                src.push_byte(b, 0);
            }
        }
        assert_eq!(src.parse_errors(), 0);
        assert_eq!(src.utc(0).unwrap().value, at().naive_utc());

        let pos = src.position(0).unwrap().value;
        let (lat, lon) = sim.position();
        assert!((pos.lat - lat).abs() < 1e-5);
        assert!((pos.lon - lon).abs() < 1e-5);
        assert!(src.satellites(0).is_some());
    }
}
