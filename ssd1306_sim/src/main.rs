use chrono::{DurationRound, TimeDelta, Utc};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use embedded_graphics_simulator::{
    sdl2::MouseButton, BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent,
    Window,
};
use gpsclock_common::display::{draw_clock, layout};
use gpsclock_common::sim::ReceiverSimulator;
use gpsclock_common::{
    ClockConfig, ClockEngine, GpsFieldSource, NmeaFieldSource, PulseFlag, TouchSample,
};
use std::thread::sleep;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(10);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClockConfig::DEFAULT;
    if let Err(e) = config.validate() {
        log::error!("invalid clock config: {e}");
        return;
    }

    let mut display = SimulatorDisplay::<BinaryColor>::new(Size::new(layout::WIDTH, layout::HEIGHT));
    let output_settings = OutputSettingsBuilder::new()
        .theme(BinaryColorTheme::OledWhite)
        .scale(6)
        .build();
    let mut w = Window::new("GPS Clock Sim", &output_settings);

    let mut receiver = ReceiverSimulator::default();
    let mut gps = NmeaFieldSource::new();
    let mut engine = ClockEngine::new(config);
    let pulse = PulseFlag::new();
    let started = Instant::now();
    let mut last_second = None;

    'running: loop {
        let now_ms = started.elapsed().as_millis() as u64;

        // The pulse marks the top of each host second; the sentences that
        // describe that second follow it, as with a real receiver.
        let second = Utc::now().duration_trunc(TimeDelta::seconds(1)).ok();
        if second != last_second {
            if let (Some(prev), Some(_)) = (last_second, second) {
                pulse.raise();
                for line in receiver.next_second(prev) {
                    for b in line.bytes() {
                        gps.push_byte(b, now_ms);
                    }
                }
            }
            last_second = second;
        }

        if let Some(redraw) = engine.poll(&gps, &pulse, now_ms) {
            let view = engine.view(now_ms);
            if let Err(e) = draw_clock(&mut display, &view, redraw) {
                match e {}
            }
        }
        w.update(&display);

        for event in w.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    point,
                } => {
                    let action = engine.touch(TouchSample::pressed_at(point.x, point.y), now_ms);
                    log::debug!("touch at {point:?}: {action:?}");
                }
                _ => {}
            }
        }

        sleep(TICK);
    }
}
