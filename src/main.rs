//! deck-input firmware for the nRF52840.
//!
//! Two executors:
//!
//! - **High priority** (`SWI1_EGU1` interrupt executor): the sampling task,
//!   ticking every [`config::TICK_MS`] and calling `on_tick`. It preempts
//!   the main loop so the debounce timings hold under load.
//! - **Thread mode**: the interpret / consume loop. The player state machine
//!   hooks in where commands are logged below.
//!
//! The input variant is picked at build time with the `rotary-encoder`
//! feature; key polarity with `active-high-keys`.

#![no_std]
#![no_main]

use defmt::{info, unwrap, warn};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_time::{Duration, Instant, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use deck_input::config;
use deck_input::InputSource;

#[cfg(not(feature = "rotary-encoder"))]
use deck_input::{KeyPins, KeyPolarity, KeyTiming, KeypadSource};
#[cfg(feature = "rotary-encoder")]
use deck_input::{EncoderPins, EncoderSource, EncoderTiming, KeyPolarity};

#[cfg(not(feature = "rotary-encoder"))]
type Source =
    KeypadSource<KeyPins<Input<'static>, Input<'static>, Input<'static>, Input<'static>>>;
#[cfg(feature = "rotary-encoder")]
type Source = EncoderSource<EncoderPins<Input<'static>, Input<'static>, Input<'static>>>;

static SOURCE: StaticCell<Source> = StaticCell::new();
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI1_EGU1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Configure the key pins (inputs, pull-ups for active-low wiring).
#[cfg(not(feature = "rotary-encoder"))]
fn configure_pins(p: embassy_nrf::Peripherals) -> Source {
    let pull = match config::KEY_POLARITY {
        KeyPolarity::ActiveLow => Pull::Up,
        KeyPolarity::ActiveHigh => Pull::None,
    };
    let pins = KeyPins::new(
        Input::new(p.P0_11, pull),
        Input::new(p.P0_12, pull),
        Input::new(p.P0_24, pull),
        Input::new(p.P0_25, pull),
        config::KEY_POLARITY,
    );
    KeypadSource::new(pins, KeyTiming::default())
}

/// Configure the encoder lines (CLK / DT floating, switch pulled up).
#[cfg(feature = "rotary-encoder")]
fn configure_pins(p: embassy_nrf::Peripherals) -> Source {
    let pins = EncoderPins::new(
        Input::new(p.P0_03, Pull::None),
        Input::new(p.P0_04, Pull::None),
        Input::new(p.P0_28, Pull::Up),
        KeyPolarity::ActiveLow,
    );
    EncoderSource::new(pins, EncoderTiming::default())
}

fn now_ms() -> u32 {
    // Wraps after ~49 days; the encoder only ever looks at differences.
    Instant::now().as_millis() as u32
}

#[embassy_executor::task]
async fn sample_task(source: &'static Source) {
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config::TICK_MS)));
    loop {
        ticker.next().await;
        if let Err(e) = source.on_tick(now_ms()) {
            warn!("Input: tick skipped: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("deck-input starting");

    let source: &'static Source = SOURCE.init(configure_pins(p));
    source.slot().clear();

    #[cfg(feature = "rotary-encoder")]
    if let Err(e) = source.resync() {
        warn!("Input: encoder resync failed: {}", e);
    }

    interrupt::SWI1_EGU1.set_priority(Priority::P6);
    let high = EXECUTOR_HIGH.start(interrupt::SWI1_EGU1);
    unwrap!(high.spawn(sample_task(source)));

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config::TICK_MS)));
    loop {
        ticker.next().await;
        source.interpret();

        let cmd = source.take_command();
        if !cmd.is_idle() {
            info!("Input: {}", cmd);
        }
    }
}
