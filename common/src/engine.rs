//! The clock's whole mutable state, advanced one poll cycle at a time.

use heapless::String;

use crate::config::ClockConfig;
use crate::gps::{Field, GpsFieldSource};
use crate::grid;
use crate::pulse::PulseFlag;
use crate::refresh::{Frame, RefreshTracker, Redraw};
use crate::screen::{DisplayModes, PresentationDispatcher, Screen, TimeView, TouchAction};
use crate::status::ConfidenceGrade;
use crate::sync::{SyncState, Synchronizer};
use crate::time::{Instant, TimeBase};
use crate::touch::TouchSample;
use crate::view::{ClockView, ShownTime};
use crate::zone::ZoneRule;
use crate::Telemetry;

/// Position, satellites and motion older than this are shown as missing.
pub const TELEMETRY_MAX_AGE_MS: u64 = 5_000;

const UTC_LABEL: &str = "UTC";

/// Owns every piece of clock state. Each field has exactly one writer: the
/// synchronizer writes the time base, the dispatcher writes screen and
/// modes, and the refresh tracker remembers what is on the panel.
#[derive(Clone, Debug)]
pub struct ClockEngine {
    config: ClockConfig,
    time_base: TimeBase,
    sync: Synchronizer,
    dispatcher: PresentationDispatcher,
    refresh: RefreshTracker,
    telemetry: Telemetry,
}

impl ClockEngine {
    pub const fn new(config: ClockConfig) -> Self {
        Self {
            time_base: TimeBase::new(),
            sync: Synchronizer::new(config.sync_policy),
            dispatcher: PresentationDispatcher::new(
                config.initial_screen,
                config.modes(),
                config.regions,
                config.touch_quiet_ms,
            ),
            refresh: RefreshTracker::new(config.status_refresh_secs as u64),
            telemetry: Telemetry {
                position: None,
                satellites: None,
                speed_knots: None,
                course_deg: None,
            },
            config,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.dispatcher.screen()
    }

    pub fn modes(&self) -> DisplayModes {
        self.dispatcher.modes()
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    pub fn last_sync(&self) -> Option<Instant> {
        self.sync.last_sync()
    }

    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    pub fn utc_now(&self, now_ms: u64) -> Option<Instant> {
        self.time_base.now(now_ms)
    }

    /// Local wall-clock instant and the rule in force.
    pub fn local_now(&self, now_ms: u64) -> Option<(Instant, ZoneRule)> {
        self.config.zone.to_local_opt(self.utc_now(now_ms))
    }

    /// One cycle: take the pulse, try to sync, pick up telemetry, then decide
    /// what needs drawing. The receiver's bytes must already be pushed.
    pub fn poll<G: GpsFieldSource>(
        &mut self,
        gps: &G,
        pulse: &PulseFlag,
        now_ms: u64,
    ) -> Option<Redraw> {
        let pulse_fired = pulse.take();
        self.sync
            .try_discipline(pulse_fired, gps, &mut self.time_base, now_ms);

        self.telemetry = Telemetry {
            position: recent(gps.position(now_ms)),
            satellites: recent(gps.satellites(now_ms)),
            speed_knots: recent(gps.speed_knots(now_ms)),
            course_deg: recent(gps.course_deg(now_ms)),
        };

        let view = self.modes().time_view;
        let frame = self.utc_now(now_ms).map(|utc| {
            let (local, rule) = self.config.zone.to_local(utc);
            Frame {
                at: match view {
                    TimeView::Utc => utc,
                    TimeView::Local => local,
                },
                zone: rule.abbreviation,
            }
        });
        self.refresh.plan(frame, now_ms / 1000)
    }

    /// Feed one touch sample. A released panel does nothing.
    pub fn touch(&mut self, sample: TouchSample, now_ms: u64) -> TouchAction {
        let Some(point) = sample.point() else {
            return TouchAction::Ignored;
        };
        let action = self.dispatcher.handle_touch(point, now_ms);
        if action.needs_full_redraw() {
            self.refresh.invalidate();
        }
        action
    }

    /// Snapshot for the renderer.
    pub fn view(&self, now_ms: u64) -> ClockView {
        let utc = self.utc_now(now_ms);
        let local = self.local_now(now_ms).map(|(at, rule)| ShownTime {
            at: at.to_naive(),
            zone: rule.abbreviation,
        });
        let utc_shown = utc.map(|at| ShownTime {
            at: at.to_naive(),
            zone: UTC_LABEL,
        });
        let modes = self.modes();

        ClockView {
            screen: self.screen(),
            modes,
            main: match modes.time_view {
                TimeView::Local => local,
                TimeView::Utc => utc_shown,
            },
            local,
            utc: utc_shown,
            grade: self.grade(utc),
            grid: self.grid(),
            telemetry: self.telemetry,
        }
    }

    /// `None` while never synced.
    pub fn grade(&self, now: Option<Instant>) -> Option<ConfidenceGrade> {
        match (now, self.sync.last_sync()) {
            (Some(now), Some(last)) => Some(self.config.staleness.classify(now, last)),
            _ => None,
        }
    }

    fn grid(&self) -> String<{ grid::MAX_LEN }> {
        self.telemetry
            .position
            .map(|p| grid::locate(p.lat, p.lon, self.config.grid_length))
            .unwrap_or_default()
    }
}

fn recent<T>(field: Option<Field<T>>) -> Option<T> {
    field
        .filter(|f| f.fresher_than(TELEMETRY_MAX_AGE_MS))
        .map(|f| f.value)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::display::layout;
    use crate::gps::Position;
    use crate::screen::HourFormat;
    use crate::sync::SyncPolicy;
    use crate::zone::presets;

    #[derive(Default)]
    struct FixedGps {
        utc: Option<(NaiveDateTime, u64)>,
        position: Option<(Position, u64)>,
    }

    impl GpsFieldSource for FixedGps {
        fn push_byte(&mut self, _byte: u8, _now_ms: u64) {}

        fn utc(&self, now_ms: u64) -> Option<Field<NaiveDateTime>> {
            self.utc.map(|(value, at)| Field {
                value,
                age_ms: now_ms - at,
            })
        }

        fn position(&self, now_ms: u64) -> Option<Field<Position>> {
            self.position.map(|(value, at)| Field {
                value,
                age_ms: now_ms - at,
            })
        }

        fn satellites(&self, _now_ms: u64) -> Option<Field<u8>> {
            None
        }

        fn speed_knots(&self, _now_ms: u64) -> Option<Field<f32>> {
            None
        }

        fn course_deg(&self, _now_ms: u64) -> Option<Field<f32>> {
            None
        }
    }

    fn utc(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn synced_engine() -> (ClockEngine, FixedGps) {
        let mut engine = ClockEngine::new(ClockConfig::DEFAULT);
        let gps = FixedGps {
            utc: Some((utc(14, 3, 9), 900)),
            position: Some((
                Position {
                    lat: 41.714,
                    lon: -72.727,
                },
                900,
            )),
        };
        let pulse = PulseFlag::new();
        pulse.raise();
        engine.poll(&gps, &pulse, 1_000);
        (engine, gps)
    }

    #[test]
    fn unsynced_view_has_no_time_and_no_grade() {
        let mut engine = ClockEngine::new(ClockConfig::DEFAULT);
        let pulse = PulseFlag::new();
        assert_eq!(
            engine.poll(&FixedGps::default(), &pulse, 0),
            Some(Redraw::FULL)
        );
        let view = engine.view(0);
        assert_eq!(view.main, None);
        assert_eq!(view.local, None);
        assert_eq!(view.utc, None);
        assert_eq!(view.grade, None);
        assert!(view.grid.is_empty());
    }

    #[test]
    fn pulse_sync_shows_local_time() {
        let (engine, _) = synced_engine();
        assert_eq!(engine.utc_now(1_000), Some(Instant::from_naive(utc(14, 3, 10))));

        let view = engine.view(1_000);
        let main = view.main.unwrap();
        assert_eq!(main.at, utc(10, 3, 10));
        assert_eq!(main.zone, "EDT");
        assert_eq!(view.utc.unwrap().zone, "UTC");
        assert_eq!(view.grade, Some(ConfidenceGrade::Fresh));
        assert_eq!(view.grid.as_str(), "FN31pr");
    }

    #[test]
    fn poll_records_the_pulse_it_took() {
        let (engine, _) = synced_engine();
        assert!(engine.sync_state().pending_pulse);
        assert!(engine.last_sync().is_some());
    }

    #[test]
    fn poll_clears_the_pulse_even_when_sync_is_rejected() {
        let mut engine = ClockEngine::new(ClockConfig::DEFAULT);
        let stale = FixedGps {
            utc: Some((utc(14, 3, 9), 0)),
            position: None,
        };
        let pulse = PulseFlag::new();
        pulse.raise();
        engine.poll(&stale, &pulse, 5_000);
        assert_eq!(engine.last_sync(), None);
        assert!(!pulse.take());

        pulse.raise();
        engine.poll(&FixedGps::default(), &pulse, 6_000);
        assert_eq!(engine.last_sync(), None);
        assert!(!pulse.take());
    }

    #[test]
    fn grade_ages_with_the_clock() {
        let (engine, _) = synced_engine();
        let later = 1_000 + 7_200 * 1_000;
        assert_eq!(
            engine.view(later).grade,
            Some(ConfidenceGrade::Marginal)
        );
    }

    #[test]
    fn telemetry_goes_missing_when_quiet() {
        let (mut engine, gps) = synced_engine();
        assert!(engine.telemetry().position.is_some());
        engine.poll(&gps, &PulseFlag::new(), 900 + TELEMETRY_MAX_AGE_MS);
        assert_eq!(engine.telemetry().position, None);
    }

    #[test]
    fn utc_view_follows_the_time_base() {
        let mut engine = ClockEngine::new(ClockConfig {
            time_view: TimeView::Utc,
            hour_format: HourFormat::H24,
            sync_policy: SyncPolicy::Unconditional,
            zone: presets::US_PACIFIC,
            ..ClockConfig::DEFAULT
        });
        let gps = FixedGps {
            utc: Some((utc(23, 59, 59), 0)),
            position: None,
        };
        engine.poll(&gps, &PulseFlag::new(), 10);
        assert_eq!(engine.view(10).main.unwrap().at, utc(0, 0, 0) + chrono::Days::new(1));
        assert_eq!(engine.view(10).local.unwrap().zone, "PDT");
    }

    #[test]
    fn screen_change_forces_full_redraw() {
        let (mut engine, gps) = synced_engine();
        assert_eq!(engine.poll(&gps, &PulseFlag::new(), 1_200), None);

        let at = layout::TIME_REGION;
        let action = engine.touch(TouchSample::pressed_at(at.x + 1, at.y + 1), 1_300);
        assert!(action.needs_full_redraw());
        assert_eq!(engine.screen(), Screen::DualTime);
        assert_eq!(engine.poll(&gps, &PulseFlag::new(), 1_400), Some(Redraw::FULL));
    }

    #[test]
    fn released_panel_is_ignored() {
        let (mut engine, _) = synced_engine();
        assert_eq!(
            engine.touch(TouchSample::RELEASED, 2_000),
            TouchAction::Ignored
        );
        assert_eq!(engine.screen(), Screen::Primary);
    }
}
