//! Maidenhead grid locator.

use heapless::String;

pub const MAX_LEN: usize = 10;

/// Per character pair: longitude step (degrees), latitude step (degrees),
/// first character, number of characters in the class.
const PAIRS: [(f64, f64, u8, u32); 5] = [
    (20.0, 10.0, b'A', 18),
    (2.0, 1.0, b'0', 10),
    (5.0 / 60.0, 2.5 / 60.0, b'a', 24),
    (0.5 / 60.0, 0.25 / 60.0, b'0', 10),
    (1.25 / 3600.0, 0.625 / 3600.0, b'A', 24),
];

/// Grid square of `length` characters for the given position. Out-of-range
/// coordinates or a length over [`MAX_LEN`] give an empty string; a length of
/// zero turns the feature off.
pub fn locate(lat: f64, lon: f64, length: usize) -> String<MAX_LEN> {
    let mut out = String::new();
    let mut lon = lon + 180.0;
    let mut lat = lat + 90.0;
    // Written as negated ranges so NaN lands here too.
    if !(0.0..=360.0).contains(&lon) || !(0.0..=180.0).contains(&lat) || length > MAX_LEN {
        trace!("grid input out of range");
        return out;
    }

    for (lon_step, lat_step, base, count) in PAIRS {
        if out.len() >= length {
            break;
        }
        // Inputs are non-negative here, so truncation is floor.
        let x = ((lon / lon_step) as u32).min(count - 1);
        let y = ((lat / lat_step) as u32).min(count - 1);
        lon -= x as f64 * lon_step;
        lat -= y as f64 * lat_step;
        let _ = out.push((base + x as u8) as char);
        let _ = out.push((base + y as u8) as char);
    }
    out.truncate(length);
    out
}
