#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One polled reading from the touch controller. Turning pressure into
/// `pressed` is the controller's job.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub pressed: bool,
    pub x: i32,
    pub y: i32,
}

impl TouchSample {
    pub const RELEASED: Self = Self {
        pressed: false,
        x: 0,
        y: 0,
    };

    pub const fn pressed_at(x: i32, y: i32) -> Self {
        Self { pressed: true, x, y }
    }

    pub fn point(self) -> Option<TouchPoint> {
        self.pressed.then_some(TouchPoint::new(self.x, self.y))
    }
}

/// Axis-aligned screen rectangle. Both edges count as inside.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TouchRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TouchRegion {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn contains(&self, p: TouchPoint) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Quiet period after an accepted touch, so one press is one event.
#[derive(Copy, Clone, Debug)]
pub struct Debounce {
    quiet_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl Debounce {
    pub const fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            last_accepted_ms: None,
        }
    }

    /// True if a touch at `now_ms` should be handled; records it if so.
    pub fn accept(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted_ms {
            if now_ms.saturating_sub(last) < self.quiet_ms {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}
