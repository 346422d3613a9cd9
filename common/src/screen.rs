//! Which screen is showing, and what a touch on it does.

use crate::display::layout;
use crate::touch::{Debounce, TouchPoint, TouchRegion};

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Primary,
    DualTime,
    Location,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeView {
    Local,
    Utc,
}

impl TimeView {
    pub fn toggled(self) -> Self {
        match self {
            Self::Local => Self::Utc,
            Self::Utc => Self::Local,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HourFormat {
    H12,
    H24,
}

impl HourFormat {
    pub fn toggled(self) -> Self {
        match self {
            Self::H12 => Self::H24,
            Self::H24 => Self::H12,
        }
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayModes {
    pub time_view: TimeView,
    pub hour_format: HourFormat,
}

/// Touch targets on the primary screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrimaryRegions {
    pub time: TouchRegion,
    pub location: TouchRegion,
    pub zone: TouchRegion,
    pub am_pm: TouchRegion,
}

impl PrimaryRegions {
    pub const DEFAULT: Self = Self {
        time: layout::TIME_REGION,
        location: layout::LOCATION_REGION,
        zone: layout::ZONE_REGION,
        am_pm: layout::AM_PM_REGION,
    };
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchAction {
    /// Landed outside every region.
    Ignored,
    /// Inside the quiet period after the previous touch.
    Debounced,
    ScreenChanged { from: Screen, to: Screen },
    TimeViewToggled(TimeView),
    HourFormatToggled(HourFormat),
}

impl TouchAction {
    /// Whether everything on screen must be drawn again.
    pub fn needs_full_redraw(self) -> bool {
        !matches!(self, Self::Ignored | Self::Debounced)
    }
}

#[derive(Clone, Debug)]
pub struct PresentationDispatcher {
    screen: Screen,
    modes: DisplayModes,
    regions: PrimaryRegions,
    debounce: Debounce,
}

impl PresentationDispatcher {
    pub const fn new(
        initial: Screen,
        modes: DisplayModes,
        regions: PrimaryRegions,
        quiet_ms: u64,
    ) -> Self {
        Self {
            screen: initial,
            modes,
            regions,
            debounce: Debounce::new(quiet_ms),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn modes(&self) -> DisplayModes {
        self.modes
    }

    pub fn handle_touch(&mut self, point: TouchPoint, now_ms: u64) -> TouchAction {
        let action = match self.screen {
            Screen::Primary => self.primary_action(point),
            other => TouchAction::ScreenChanged {
                from: other,
                to: Screen::Primary,
            },
        };
        if matches!(action, TouchAction::Ignored) {
            return action;
        }
        if !self.debounce.accept(now_ms) {
            return TouchAction::Debounced;
        }

        match action {
            TouchAction::ScreenChanged { from, to } => {
                self.screen = to;
                info!("screen {:?} -> {:?}", from, to);
            }
            TouchAction::TimeViewToggled(view) => {
                self.modes.time_view = view;
                debug!("time view {:?}", view);
            }
            TouchAction::HourFormatToggled(format) => {
                self.modes.hour_format = format;
                debug!("hour format {:?}", format);
            }
            TouchAction::Ignored | TouchAction::Debounced => {}
        }
        action
    }

    fn primary_action(&self, point: TouchPoint) -> TouchAction {
        let r = &self.regions;
        if r.zone.contains(point) {
            TouchAction::TimeViewToggled(self.modes.time_view.toggled())
        } else if r.am_pm.contains(point) {
            TouchAction::HourFormatToggled(self.modes.hour_format.toggled())
        } else if r.time.contains(point) {
            TouchAction::ScreenChanged {
                from: Screen::Primary,
                to: Screen::DualTime,
            }
        } else if r.location.contains(point) {
            TouchAction::ScreenChanged {
                from: Screen::Primary,
                to: Screen::Location,
            }
        } else {
            TouchAction::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: DisplayModes = DisplayModes {
        time_view: TimeView::Local,
        hour_format: HourFormat::H24,
    };

    fn center(r: TouchRegion) -> TouchPoint {
        TouchPoint::new(r.x + r.width / 2, r.y + r.height / 2)
    }

    fn dispatcher() -> PresentationDispatcher {
        PresentationDispatcher::new(Screen::Primary, MODES, PrimaryRegions::DEFAULT, 300)
    }

    #[test]
    fn time_region_opens_dual_time() {
        let mut d = dispatcher();
        let action = d.handle_touch(center(PrimaryRegions::DEFAULT.time), 0);
        assert_eq!(
            action,
            TouchAction::ScreenChanged {
                from: Screen::Primary,
                to: Screen::DualTime
            }
        );
        assert_eq!(d.screen(), Screen::DualTime);
    }

    #[test]
    fn location_region_opens_location() {
        let mut d = dispatcher();
        d.handle_touch(center(PrimaryRegions::DEFAULT.location), 0);
        assert_eq!(d.screen(), Screen::Location);
    }

    #[test]
    fn any_touch_on_secondary_screen_returns_home() {
        for start in [Screen::DualTime, Screen::Location] {
            let mut d = PresentationDispatcher::new(start, MODES, PrimaryRegions::DEFAULT, 300);
            let action = d.handle_touch(TouchPoint::new(-50, 9_999), 0);
            assert!(action.needs_full_redraw());
            assert_eq!(d.screen(), Screen::Primary);
        }
    }

    #[test]
    fn zone_and_am_pm_toggle_without_leaving_primary() {
        let mut d = dispatcher();
        assert_eq!(
            d.handle_touch(center(PrimaryRegions::DEFAULT.zone), 0),
            TouchAction::TimeViewToggled(TimeView::Utc)
        );
        assert_eq!(
            d.handle_touch(center(PrimaryRegions::DEFAULT.am_pm), 1_000),
            TouchAction::HourFormatToggled(HourFormat::H12)
        );
        assert_eq!(d.screen(), Screen::Primary);
        assert_eq!(
            d.modes(),
            DisplayModes {
                time_view: TimeView::Utc,
                hour_format: HourFormat::H12,
            }
        );
    }

    #[test]
    fn touch_outside_regions_is_ignored() {
        let mut d = dispatcher();
        let action = d.handle_touch(TouchPoint::new(-1, -1), 0);
        assert_eq!(action, TouchAction::Ignored);
        assert!(!action.needs_full_redraw());
        assert_eq!(d.screen(), Screen::Primary);
    }

    #[test]
    fn repeat_touch_inside_quiet_period_is_dropped() {
        let mut d = dispatcher();
        d.handle_touch(center(PrimaryRegions::DEFAULT.time), 10_000);
        assert_eq!(
            d.handle_touch(TouchPoint::new(0, 0), 10_100),
            TouchAction::Debounced
        );
        assert_eq!(d.screen(), Screen::DualTime);
        d.handle_touch(TouchPoint::new(0, 0), 10_300);
        assert_eq!(d.screen(), Screen::Primary);
    }

    #[test]
    fn regions_do_not_overlap() {
        let r = PrimaryRegions::DEFAULT;
        let all = [r.time, r.location, r.zone, r.am_pm];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                let apart = a.x + a.width < b.x
                    || b.x + b.width < a.x
                    || a.y + a.height < b.y
                    || b.y + b.height < a.y;
                assert!(apart, "{a:?} overlaps {b:?}");
            }
        }
    }
}
