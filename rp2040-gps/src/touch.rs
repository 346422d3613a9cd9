//! XPT2046 resistive touch controller over SPI.

use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;
use gpsclock_common::display::layout;
use gpsclock_common::TouchSample;

// Start bit, 12-bit conversion, differential reference, power down between reads.
const READ_X: u8 = 0xD0;
const READ_Y: u8 = 0x90;

/// Raw 12-bit readings at the panel edges. Readings outside are clamped.
#[derive(Copy, Clone, Debug, defmt::Format)]
pub struct Calibration {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
}

impl Calibration {
    pub const DEFAULT: Self = Self {
        x_min: 200,
        x_max: 3900,
        y_min: 250,
        y_max: 3850,
    };

    fn map(&self, raw: u16, min: u16, max: u16, span: u32) -> i32 {
        let raw = raw.clamp(min, max);
        let range = u32::from(max - min).max(1);
        (u32::from(raw - min) * (span - 1) / range) as i32
    }

    fn to_screen(&self, raw_x: u16, raw_y: u16) -> (i32, i32) {
        (
            self.map(raw_x, self.x_min, self.x_max, layout::WIDTH),
            self.map(raw_y, self.y_min, self.y_max, layout::HEIGHT),
        )
    }
}

pub struct Xpt2046<SPI, IRQ> {
    spi: SPI,
    pen_irq: IRQ,
    calibration: Calibration,
}

impl<SPI, IRQ> Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    pub fn new(spi: SPI, pen_irq: IRQ, calibration: Calibration) -> Self {
        Self {
            spi,
            pen_irq,
            calibration,
        }
    }

    /// Poll once. The pen IRQ line is low while the panel is pressed, so the
    /// bus is only touched when there is something to read.
    pub fn sample(&mut self) -> Result<TouchSample, SPI::Error> {
        if self.pen_irq.is_high().unwrap_or(true) {
            return Ok(TouchSample::RELEASED);
        }
        let raw_x = self.read(READ_X)?;
        let raw_y = self.read(READ_Y)?;
        let (x, y) = self.calibration.to_screen(raw_x, raw_y);
        Ok(TouchSample::pressed_at(x, y))
    }

    fn read(&mut self, command: u8) -> Result<u16, SPI::Error> {
        let mut buf = [command, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;
        Ok((u16::from(buf[1]) << 8 | u16::from(buf[2])) >> 3)
    }
}
