#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Must come first so the logging macros are visible to every module below.
mod fmt;

pub mod config;
pub mod display;
pub mod engine;
pub mod gps;
pub mod grid;
pub mod pulse;
pub mod refresh;
pub mod screen;
#[cfg(feature = "simulated_data")]
pub mod sim;
pub mod status;
pub mod sync;
pub mod time;
pub mod touch;
pub mod view;
pub mod zone;

pub use config::{ClockConfig, ConfigError};
pub use engine::ClockEngine;
pub use gps::{GpsFieldSource, NmeaFieldSource, Position};
pub use pulse::PulseFlag;
pub use refresh::Redraw;
pub use screen::{Screen, TouchAction};
pub use status::ConfidenceGrade;
pub use time::{Instant, TimeBase};
pub use touch::{TouchPoint, TouchSample};

/// Receiver readings shown next to the clock. Each is `None` while the
/// receiver reports it invalid or has gone quiet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Telemetry {
    pub position: Option<Position>,
    pub satellites: Option<u8>,
    pub speed_knots: Option<f32>,
    pub course_deg: Option<f32>,
}
