//! Decides which fields need drawing this cycle.

use chrono::Timelike;

use crate::time::Instant;

/// Fields to draw. `full` means clear the screen and draw everything.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Redraw {
    pub full: bool,
    pub time: bool,
    pub date: bool,
    /// Zone label and AM/PM.
    pub hour_fields: bool,
    /// Confidence grade, satellites, grid and position.
    pub status: bool,
}

impl Redraw {
    pub const FULL: Self = Self {
        full: true,
        time: true,
        date: true,
        hour_fields: true,
        status: true,
    };

    fn status_only() -> Self {
        Self {
            status: true,
            ..Self::default()
        }
    }
}

/// The reading a cycle would put on the panel: the instant in the selected
/// view and the local zone label in force at that moment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub at: Instant,
    pub zone: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Shown {
    /// Nothing drawn since the last invalidate.
    Nothing,
    /// Placeholders drawn; the clock had no time yet.
    Unset,
    At(Frame),
}

#[derive(Clone, Debug)]
pub struct RefreshTracker {
    shown: Shown,
    status_at: Option<u64>,
    status_every_secs: u64,
}

impl RefreshTracker {
    pub const fn new(status_every_secs: u64) -> Self {
        Self {
            shown: Shown::Nothing,
            status_at: None,
            status_every_secs,
        }
    }

    /// Forget what is on screen; the next plan is a full redraw.
    pub fn invalidate(&mut self) {
        self.shown = Shown::Nothing;
        self.status_at = None;
    }

    /// Compare the frame about to be displayed with the one on screen.
    /// `uptime_secs` paces status refreshes independently of the clock so
    /// they continue before the first sync.
    pub fn plan(&mut self, shown: Option<Frame>, uptime_secs: u64) -> Option<Redraw> {
        let status_due = self
            .status_at
            .map_or(true, |at| uptime_secs.saturating_sub(at) >= self.status_every_secs);

        let redraw = match (self.shown, shown) {
            (Shown::Nothing, _) | (Shown::Unset, Some(_)) | (Shown::At(_), None) => Redraw::FULL,
            (Shown::Unset, None) => {
                if !status_due {
                    return None;
                }
                Redraw::status_only()
            }
            (Shown::At(prev), Some(now)) => {
                if prev == now {
                    return None;
                }
                let (p, n) = (prev.at.to_naive(), now.at.to_naive());
                let date = p.date() != n.date();
                // Leaving daylight time repeats the local hour, so the label
                // is compared as well.
                let zone = prev.zone != now.zone;
                Redraw {
                    full: false,
                    time: true,
                    date,
                    hour_fields: date || zone || p.hour() != n.hour(),
                    status: status_due || date || p.minute() != n.minute(),
                }
            }
        };

        self.shown = shown.map_or(Shown::Unset, Shown::At);
        if redraw.status {
            self.status_at = Some(uptime_secs);
        }
        Some(redraw)
    }
}
