//! DDS Function Generator Main Application
//!
//! Entry point for the STM32G474 front-panel firmware.
//! Brings up the peripherals, restores the settings and runs the panel loop.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::flash::Flash;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_time::{Delay, Ticker};
use {defmt_rtt as _, panic_probe as _};

use dds_funcgen::drivers::buzzer::Buzzer;
use dds_funcgen::drivers::generator::SignalChain;
use dds_funcgen::drivers::lcd::Lcd;
use dds_funcgen::hal::flash::FlashStore;
use dds_funcgen::hal::gpio::PanelButtons;
use dds_funcgen::input::PulseCounters;
use dds_funcgen::prelude::*;

/// Encoder detents and idle clock, shared with the input tasks
static PULSES: PulseCounters = PulseCounters::new();

/// Power-on banner duration
const BANNER_MS: u64 = 2500;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("DDS Function Generator v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // Panel inputs: active low with pull-ups
    let encoder_a = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);
    let encoder_b = Input::new(p.PA1, Pull::Up);
    let encoder_sw = Input::new(p.PA2, Pull::Up);
    let select_sw = Input::new(p.PA3, Pull::Up);
    let mut buttons = PanelButtons::new(select_sw, encoder_sw, &PULSES);
    let policy = buttons.sense_policy();
    info!("edit policy: {}", policy);

    // LCD on I2C1 (PB8 = SCL, PB9 = SDA)
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        i2c::Config::default(),
    );
    let mut lcd = Lcd::new(i2c, Delay);
    if let Err(e) = show_banners(&mut lcd, policy, &buttons).await {
        warn!("lcd: {}", e);
    }

    // DDS and level DAC share SPI1 in mode 2
    let mut spi_config = spi::Config::default();
    spi_config.mode = spi::MODE_2;
    spi_config.frequency = Hertz(SPI_FREQUENCY_HZ);
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PA5, p.PA7, spi_config);
    let dds_cs = Output::new(p.PA4, Level::High, Speed::VeryHigh);
    let dac_cs = Output::new(p.PB1, Level::High, Speed::VeryHigh);
    let relay = Output::new(p.PB0, Level::Low, Speed::Low);
    let mut chain = SignalChain::new(spi, dds_cs, dac_cs, relay, Delay);
    if let Err(e) = chain.init() {
        warn!("signal chain: {}", e);
    }

    let buzzer = match Buzzer::new(Output::new(p.PC0, Level::Low, Speed::Low), Delay) {
        Ok(buzzer) => buzzer,
        Err(e) => defmt::panic!("buzzer: {}", e),
    };
    let store = FlashStore::new(Flash::new_blocking(p.FLASH));

    let instrument = Instrument::new(chain, lcd, buzzer, store);
    let mut panel = match FrontPanel::boot(instrument, policy) {
        Ok(panel) => panel,
        Err(e) => defmt::panic!("boot: {}", e),
    };

    if spawner.spawn(tick_task()).is_err() {
        warn!("tick task not started");
    }
    if spawner.spawn(encoder_task(encoder_a, encoder_b)).is_err() {
        warn!("encoder task not started");
    }

    let mut watchdog = IndependentWatchdog::new(p.IWDG, WATCHDOG_TIMEOUT_US);
    watchdog.unleash();
    info!("watchdog armed: {} us", WATCHDOG_TIMEOUT_US);

    loop {
        watchdog.pet();
        if let Err(e) = panel.poll(&mut buttons) {
            warn!("panel pass failed: {}", e);
        }
        embassy_futures::yield_now().await;
    }
}

/// Power-on text, plus a reminder when edits need confirming
async fn show_banners<I2C, D>(
    lcd: &mut Lcd<I2C, D>,
    policy: EditPolicy,
    buttons: &PanelButtons<'_>,
) -> Result<()>
where
    I2C: embedded_hal::i2c::I2c,
    D: DelayNs,
{
    lcd.init()?;
    lcd.show_banner("DDS Function Ge-", "nerator (AD9833)")?;
    Timer::after_millis(BANNER_MS).await;
    lcd.show_banner("Range:1Hz-0.5MHz", "TTL:  1Hz-5.0MHz")?;
    Timer::after_millis(BANNER_MS).await;
    if policy.needs_confirmation() {
        lcd.show_banner("Pressing button ", "changes value!")?;
        // Wait for the button that selected the policy to be let go
        while buttons.encoder_held() {
            Timer::after_millis(10).await;
        }
        Timer::after_millis(BANNER_MS).await;
    }
    lcd.clear()
}

/// Idle clock: one tick per `IDLE_TICK_MS`
#[embassy_executor::task]
async fn tick_task() {
    let mut ticker = Ticker::every(Duration::from_millis(IDLE_TICK_MS));
    loop {
        ticker.next().await;
        PULSES.tick();
    }
}

/// One detent per falling edge of phase A; phase B high means a left turn
#[embassy_executor::task]
async fn encoder_task(mut phase_a: ExtiInput<'static>, phase_b: Input<'static>) {
    loop {
        phase_a.wait_for_falling_edge().await;
        let rotation = if phase_b.is_high() {
            Rotation::Left
        } else {
            Rotation::Right
        };
        PULSES.record(rotation);
        // Contact bounce after the edge
        Timer::after_micros(50).await;
    }
}
