//! Build-time settings. Nothing here changes at run time.

use core::fmt;

use crate::grid;
use crate::screen::{DisplayModes, HourFormat, PrimaryRegions, Screen, TimeView};
use crate::status::StalenessThresholds;
use crate::sync::SyncPolicy;
use crate::zone::{presets, ZonePair};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClockConfig {
    pub zone: ZonePair,
    pub sync_policy: SyncPolicy,
    pub hour_format: HourFormat,
    pub time_view: TimeView,
    pub initial_screen: Screen,
    pub regions: PrimaryRegions,
    /// Grid square characters to show; 0 hides it.
    pub grid_length: usize,
    pub gps_baud: u32,
    pub staleness: StalenessThresholds,
    pub touch_quiet_ms: u64,
    /// Status and grid are redrawn at least this often even within a minute.
    pub status_refresh_secs: i64,
}

impl ClockConfig {
    pub const DEFAULT: Self = Self {
        zone: presets::US_EASTERN,
        sync_policy: SyncPolicy::PulseGated,
        hour_format: HourFormat::H12,
        time_view: TimeView::Local,
        initial_screen: Screen::Primary,
        regions: PrimaryRegions::DEFAULT,
        grid_length: 6,
        gps_baud: 9_600,
        staleness: StalenessThresholds::DEFAULT,
        touch_quiet_ms: 300,
        status_refresh_secs: 10,
    };

    /// Receivers without a pulse line fall back to resyncing every 100 s.
    pub const WITHOUT_PULSE: Self = Self {
        sync_policy: SyncPolicy::Interval {
            min_interval_secs: 100,
        },
        ..Self::DEFAULT
    };

    pub const fn modes(&self) -> DisplayModes {
        DisplayModes {
            time_view: self.time_view,
            hour_format: self.hour_format,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_length > grid::MAX_LEN {
            return Err(ConfigError::GridLength(self.grid_length));
        }
        let s = self.staleness;
        if s.marginal_after_secs <= 0 || s.stale_after_secs <= s.marginal_after_secs {
            return Err(ConfigError::Thresholds);
        }
        if let SyncPolicy::Interval { min_interval_secs } = self.sync_policy {
            if min_interval_secs <= 0 {
                return Err(ConfigError::ResyncInterval(min_interval_secs));
            }
        }
        for zone in [self.zone.daylight, self.zone.standard] {
            let t = zone.transition;
            if !(1..=12).contains(&t.month) || t.hour > 23 {
                return Err(ConfigError::Transition(zone.abbreviation));
            }
            if zone.abbreviation.len() > crate::view::ZONE_LABEL_MAX {
                return Err(ConfigError::Abbreviation(zone.abbreviation));
            }
        }
        if self.status_refresh_secs <= 0 {
            return Err(ConfigError::StatusRefresh(self.status_refresh_secs));
        }
        Ok(())
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    GridLength(usize),
    Thresholds,
    ResyncInterval(i64),
    Transition(&'static str),
    Abbreviation(&'static str),
    StatusRefresh(i64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridLength(n) => write!(f, "grid length {n} exceeds {}", grid::MAX_LEN),
            Self::Thresholds => f.write_str("staleness thresholds must be positive and ascending"),
            Self::ResyncInterval(n) => write!(f, "resync interval {n}s must be positive"),
            Self::Transition(zone) => write!(f, "zone {zone} has an impossible transition"),
            Self::Abbreviation(zone) => write!(f, "zone abbreviation {zone} is too long"),
            Self::StatusRefresh(n) => write!(f, "status refresh {n}s must be positive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_configs_are_valid() {
        assert_eq!(ClockConfig::DEFAULT.validate(), Ok(()));
        assert_eq!(ClockConfig::WITHOUT_PULSE.validate(), Ok(()));
    }

    #[test]
    fn rejects_oversized_grid() {
        let cfg = ClockConfig {
            grid_length: 12,
            ..ClockConfig::DEFAULT
        };
        assert_eq!(cfg.validate(), Err(ConfigError::GridLength(12)));
        assert_eq!(
            cfg.validate().unwrap_err().to_string(),
            "grid length 12 exceeds 10"
        );
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let cfg = ClockConfig {
            staleness: StalenessThresholds {
                marginal_after_secs: 100,
                stale_after_secs: 50,
            },
            ..ClockConfig::DEFAULT
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Thresholds));
    }

    #[test]
    fn every_preset_zone_validates() {
        for zone in [
            presets::UTC,
            presets::US_EASTERN,
            presets::US_CENTRAL,
            presets::US_MOUNTAIN,
            presets::US_PACIFIC,
            presets::UK,
            presets::CENTRAL_EUROPE,
            presets::AUSTRALIA_EASTERN,
        ] {
            let cfg = ClockConfig {
                zone,
                ..ClockConfig::DEFAULT
            };
            assert_eq!(cfg.validate(), Ok(()));
        }
    }
}
