use core::sync::atomic::{AtomicBool, Ordering};

/// Once-per-second pulse latch shared between the pulse interrupt and the
/// main loop. The interrupt side only ever raises it; the loop reads then
/// clears it once per cycle. Plain load/store keeps this usable on cores
/// without compare-and-swap.
pub struct PulseFlag {
    raised: AtomicBool,
}

impl Default for PulseFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Interrupt side. Does nothing else.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Main-loop side: report whether a pulse arrived since the last call and
    /// clear the latch.
    pub fn take(&self) -> bool {
        let fired = self.raised.load(Ordering::Acquire);
        if fired {
            self.raised.store(false, Ordering::Release);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_the_latch() {
        static PPS: PulseFlag = PulseFlag::new();
        assert!(!PPS.take());
        PPS.raise();
        PPS.raise();
        assert!(PPS.take());
        assert!(!PPS.take());
    }
}
