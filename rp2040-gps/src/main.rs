#![no_std]
#![no_main]

mod touch;

use defmt::*;
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::{I2C1, SPI1, UART0};
use embassy_rp::spi::{Blocking, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx};
use embassy_rp::{bind_interrupts, i2c, spi, uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use gpsclock_common::display::draw_clock;
use gpsclock_common::{
    ClockConfig, ClockEngine, GpsFieldSource, NmeaFieldSource, PulseFlag, TouchSample,
};
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::touch::{Calibration, Xpt2046};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

const CONFIG: ClockConfig = ClockConfig::DEFAULT;
const TICK: Duration = Duration::from_millis(10);

static PULSE: PulseFlag = PulseFlag::new();
static GPS_BYTES: Channel<CriticalSectionRawMutex, u8, 512> = Channel::new();

type TouchSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>;
type Touch = Xpt2046<TouchSpi, Input<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("gps clock starting");
    if let Err(e) = CONFIG.validate() {
        defmt::panic!("invalid clock config: {}", e);
    }
    info!(
        "zone {} / {}, sync {:?}",
        CONFIG.zone.daylight.abbreviation,
        CONFIG.zone.standard.abbreviation,
        CONFIG.sync_policy
    );

    let p = embassy_rp::init(Default::default());

    let pps = Input::new(p.PIN_22, Pull::Down);
    spawner.spawn(pulse_task(pps)).unwrap();

    let mut i2cc = i2c::Config::default();
    i2cc.frequency = 400_000;
    let i2c = I2c::new_async(p.I2C1, p.PIN_27, p.PIN_26, Irqs, i2cc);

    let mut spi_config = spi::Config::default();
    spi_config.frequency = 2_000_000;
    let spi_bus = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, spi_config);
    let cs = Output::new(p.PIN_13, Level::High);
    let spi_device = ExclusiveDevice::new(spi_bus, cs, Delay).unwrap();
    let pen_irq = Input::new(p.PIN_14, Pull::Up);
    let touch = Xpt2046::new(spi_device, pen_irq, Calibration::DEFAULT);

    spawner.spawn(clock_task(i2c, touch)).unwrap();

    let mut config = uart::Config::default();
    config.baudrate = CONFIG.gps_baud;
    let mut rx_buf = [0u8; 1024];
    let mut uart_rx = BufferedUartRx::new(p.UART0, Irqs, p.PIN_1, &mut rx_buf, config);

    // The receiver's bytes go straight to the clock task, which decodes them
    // at the start of its next cycle.
    let mut chunk = [0u8; 64];
    loop {
        match embedded_io_async::Read::read(&mut uart_rx, &mut chunk).await {
            Ok(n) => {
                for &b in &chunk[..n] {
                    if GPS_BYTES.try_send(b).is_err() {
                        warn!("gps byte dropped");
                    }
                }
            }
            Err(e) => {
                error!("UART Read Error: {:?}", e);
            }
        }
    }
}

/// Only raises the flag; the clock task decides what the edge means.
#[embassy_executor::task]
async fn pulse_task(mut pps: Input<'static>) {
    loop {
        pps.wait_for_rising_edge().await;
        PULSE.raise();
    }
}

#[embassy_executor::task]
async fn clock_task(i2c: I2c<'static, I2C1, Async>, mut touch: Touch) {
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().unwrap();

    let mut gps = NmeaFieldSource::new();
    let mut engine = ClockEngine::new(CONFIG);
    let mut parse_errors = 0;
    let mut ticker = Ticker::every(TICK);

    loop {
        let now_ms = Instant::now().as_millis();

        while let Ok(b) = GPS_BYTES.try_receive() {
            gps.push_byte(b, now_ms);
        }
        if gps.parse_errors() != parse_errors {
            parse_errors = gps.parse_errors();
            debug!("nmea parse errors: {}", parse_errors);
        }

        if let Some(redraw) = engine.poll(&gps, &PULSE, now_ms) {
            let view = engine.view(now_ms);
            if draw_clock(&mut display, &view, redraw).is_err() {
                warn!("draw failed");
            } else if let Err(e) = display.flush() {
                warn!("flush failed: {:?}", Debug2Format(&e));
            }
        }

        let sample = touch.sample().unwrap_or_else(|_| {
            warn!("touch read failed");
            TouchSample::RELEASED
        });
        let action = engine.touch(sample, now_ms);
        if action.needs_full_redraw() {
            debug!("touch: {:?}", action);
        }

        ticker.next().await;
    }
}
