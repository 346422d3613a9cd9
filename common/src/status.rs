use crate::time::Instant;

/// How far the displayed time can be trusted.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceGrade {
    Fresh,
    Marginal,
    Stale,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StalenessThresholds {
    pub marginal_after_secs: i64,
    pub stale_after_secs: i64,
}

impl StalenessThresholds {
    pub const DEFAULT: Self = Self {
        marginal_after_secs: 3_600,
        stale_after_secs: 86_400,
    };

    /// Grade the clock given when it was last synced. There is no grade for a
    /// clock that was never synced: callers hide the indicator instead.
    pub fn classify(&self, now: Instant, last_sync: Instant) -> ConfidenceGrade {
        let age = now - last_sync;
        if age < self.marginal_after_secs {
            ConfidenceGrade::Fresh
        } else if age < self.stale_after_secs {
            ConfidenceGrade::Marginal
        } else {
            ConfidenceGrade::Stale
        }
    }
}

impl Default for StalenessThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub fn classify(now: Instant, last_sync: Instant) -> ConfidenceGrade {
    StalenessThresholds::DEFAULT.classify(now, last_sync)
}
