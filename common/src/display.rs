use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, Point, Primitive, Size};
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;

use crate::refresh::Redraw;
use crate::screen::Screen;
use crate::status::ConfidenceGrade;
use crate::view::{self, ClockView};

/// Screen positions for a 128x64 panel, and the touch targets that sit on them.
pub mod layout {
    use embedded_graphics::prelude::{Point, Size};
    use embedded_graphics::primitives::Rectangle;

    use crate::touch::TouchRegion;

    pub const WIDTH: u32 = 128;
    pub const HEIGHT: u32 = 64;

    pub const TIME: Point = Point::new(0, 0);
    pub const AM_PM: Point = Point::new(86, 0);
    pub const ZONE: Point = Point::new(86, 12);
    pub const DATE: Point = Point::new(0, 26);
    pub const STATUS: Rectangle = Rectangle::new(Point::new(102, 25), Size::new(26, 13));
    pub const SATELLITES: Point = Point::new(0, 52);
    pub const GRID: Point = Point::new(66, 52);

    pub const DUAL_LOCAL_ZONE: Point = Point::new(0, 0);
    pub const DUAL_LOCAL_TIME: Point = Point::new(0, 10);
    pub const DUAL_LOCAL_AM_PM: Point = Point::new(86, 14);
    pub const DUAL_UTC_ZONE: Point = Point::new(0, 33);
    pub const DUAL_UTC_TIME: Point = Point::new(0, 43);
    pub const DUAL_UTC_AM_PM: Point = Point::new(86, 47);

    pub const LOCATION_ROW: i32 = 12;

    pub const TIME_REGION: TouchRegion = TouchRegion::new(0, 0, 80, 22);
    pub const AM_PM_REGION: TouchRegion = TouchRegion::new(84, 0, 43, 10);
    pub const ZONE_REGION: TouchRegion = TouchRegion::new(84, 12, 43, 11);
    pub const LOCATION_REGION: TouchRegion = TouchRegion::new(0, 46, 127, 17);
}

const BIG: MonoTextStyleBuilder<BinaryColor> = MonoTextStyleBuilder::new()
    .font(&FONT_10X20)
    .text_color(BinaryColor::On);
const SMALL: MonoTextStyleBuilder<BinaryColor> = MonoTextStyleBuilder::new()
    .font(&FONT_6X10)
    .text_color(BinaryColor::On);
const SMALL_INV: MonoTextStyleBuilder<BinaryColor> = MonoTextStyleBuilder::new()
    .font(&FONT_6X10)
    .text_color(BinaryColor::Off);

/// Draw whatever `redraw` asks for on the active screen of `view`.
pub fn draw_clock<D>(display: &mut D, view: &ClockView, redraw: Redraw) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if redraw.full {
        display.clear(BinaryColor::Off)?;
    }
    match view.screen {
        Screen::Primary => draw_primary(display, view, redraw),
        Screen::DualTime => draw_dual_time(display, view, redraw),
        Screen::Location => draw_location(display, view, redraw),
    }
}

fn draw_primary<D>(display: &mut D, view: &ClockView, redraw: Redraw) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let main = view.main.as_ref();
    let format = view.modes.hour_format;

    if redraw.time {
        let text = view::time_text(main, format);
        field(display, &text, layout::TIME, BIG.build(), 8)?;
    }
    if redraw.hour_fields {
        field(display, view::am_pm_text(main, format), layout::AM_PM, SMALL.build(), 7)?;
        field(display, view::zone_text(main), layout::ZONE, SMALL.build(), 7)?;
    }
    if redraw.date {
        field(display, &view::date_text(main), layout::DATE, SMALL.build(), 16)?;
    }
    if redraw.status {
        draw_status(display, view.grade)?;
        let sats = view::satellites_text(view.telemetry.satellites);
        field(display, &sats, layout::SATELLITES, SMALL.build(), 8)?;
        field(display, &view.grid, layout::GRID, SMALL.build(), 10)?;
    }
    Ok(())
}

fn draw_dual_time<D>(display: &mut D, view: &ClockView, redraw: Redraw) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let format = view.modes.hour_format;
    let rows = [
        (
            view.local.as_ref(),
            layout::DUAL_LOCAL_ZONE,
            layout::DUAL_LOCAL_TIME,
            layout::DUAL_LOCAL_AM_PM,
        ),
        (
            view.utc.as_ref(),
            layout::DUAL_UTC_ZONE,
            layout::DUAL_UTC_TIME,
            layout::DUAL_UTC_AM_PM,
        ),
    ];
    for (shown, zone_at, time_at, am_pm_at) in rows {
        if redraw.time {
            field(display, &view::time_text(shown, format), time_at, BIG.build(), 8)?;
        }
        if redraw.hour_fields {
            field(display, view::zone_text(shown), zone_at, SMALL.build(), 7)?;
            field(display, view::am_pm_text(shown, format), am_pm_at, SMALL.build(), 7)?;
        }
    }
    Ok(())
}

fn draw_location<D>(display: &mut D, view: &ClockView, redraw: Redraw) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if !redraw.status {
        return Ok(());
    }
    let t = &view.telemetry;
    let row = |i: i32| Point::new(0, i * layout::LOCATION_ROW);
    field(display, &view::latitude_text(t.position), row(0), SMALL.build(), 12)?;
    field(display, &view::longitude_text(t.position), row(1), SMALL.build(), 12)?;
    field(display, &view.grid, row(2), SMALL.build(), 10)?;
    field(display, &view::satellites_text(t.satellites), row(3), SMALL.build(), 8)?;
    field(display, &view::speed_text(t.speed_knots), row(4), SMALL.build(), 12)?;
    field(
        display,
        &view::course_text(t.course_deg),
        Point::new(78, 4 * layout::LOCATION_ROW),
        SMALL.build(),
        8,
    )?;
    Ok(())
}

/// Sync indicator: plain when fresh, boxed when marginal, inverted when
/// stale, absent when the clock was never synced.
fn draw_status<D>(display: &mut D, grade: Option<ConfidenceGrade>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let area = layout::STATUS;
    area.into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(display)?;
    let Some(grade) = grade else {
        return Ok(());
    };

    let text_at = area.top_left + Point::new(4, 2);
    match grade {
        ConfidenceGrade::Fresh => {
            Text::with_baseline("GPS", text_at, SMALL.build(), Baseline::Top).draw(display)?;
        }
        ConfidenceGrade::Marginal => {
            area.into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(display)?;
            Text::with_baseline("GPS", text_at, SMALL.build(), Baseline::Top).draw(display)?;
        }
        ConfidenceGrade::Stale => {
            area.into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(display)?;
            Text::with_baseline("GPS", text_at, SMALL_INV.build(), Baseline::Top)
                .draw(display)?;
        }
    }
    Ok(())
}

/// Blank a fixed-width slot and draw `text` into it, so shorter text never
/// leaves pieces of the previous value behind.
fn field<D>(
    display: &mut D,
    text: &str,
    at: Point,
    style: MonoTextStyle<'static, BinaryColor>,
    width_chars: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let glyph = style.font.character_size;
    Rectangle::new(at, Size::new(glyph.width * width_chars, glyph.height))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(display)?;
    if !text.is_empty() {
        Text::with_baseline(text, at, style, Baseline::Top).draw(display)?;
    }
    Ok(())
}
