//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the function generator.
//! Front-panel timing, output limits, factory defaults and pin mappings are
//! centralized here.

use crate::types::{LevelUnit, StepSize, Waveform};

/// Seconds without input before an editing state falls back to idle
pub const MAX_IDLE_SECONDS: u8 = 30;

/// Period of the idle/housekeeping tick in milliseconds
pub const IDLE_TICK_MS: u64 = 16;

/// Ticks counted per idle second (62 x 16 ms is roughly one second)
pub const IDLE_TICKS_PER_SECOND: u8 = 62;

/// Lowest frequency the DDS is ever committed to in normal operation
pub const MIN_FREQUENCY_HZ: u32 = 1;

/// Maximum frequency for sine and triangle output (500 kHz)
pub const MAX_FREQUENCY_HZ: u32 = 500_000;

/// Maximum frequency for square (TTL) output (5 MHz)
pub const MAX_FREQUENCY_TTL_HZ: u32 = 5_000_000;

/// Factory default waveform
pub const DEFAULT_WAVEFORM: Waveform = Waveform::Sine;

/// Factory default frequency (1 kHz)
pub const DEFAULT_FREQUENCY_HZ: u32 = 1000;

/// Factory default output level in centivolts (2.00 V)
pub const DEFAULT_LEVEL: u16 = 200;

/// Factory default unit for the output level
pub const DEFAULT_LEVEL_UNIT: LevelUnit = LevelUnit::PeakToPeak;

/// Level step selected at power-up
pub const DEFAULT_LEVEL_STEP: StepSize = StepSize::Small;

/// Hardware limit of the output amplifier in centivolts peak-to-peak (6.00 Vpp)
pub const LEVEL_VPP_MAX: u16 = 600;

/// Lowest peak-to-peak level in centivolts
pub const LEVEL_VPP_MIN: u16 = 1;

/// Lowest RMS level in centivolts (same for both shapes)
pub const LEVEL_RMS_MIN: u16 = 1;

/// Duration of the confirmation tone in milliseconds
pub const CONFIRM_BEEP_MS: u16 = 80;

/// Duration of the out-of-range blip in milliseconds
pub const REJECT_BEEP_MS: u16 = 10;

/// Button debounce time in milliseconds
pub const BUTTON_DEBOUNCE_MS: u32 = 2;

/// Presses at least this long count as a long press
pub const LONG_PRESS_MS: u32 = 500;

/// Presses held at least this long are discarded as stuck
pub const MAX_PRESS_MS: u32 = 5000;

/// Settling time after energizing the output relay
pub const RELAY_SETTLE_MS: u32 = 10;

/// AD9833 master clock of the DDS module (25 MHz crystal)
pub const DDS_MCLK_HZ: u32 = 25_000_000;

/// SPI clock shared by the DDS and the level DAC
pub const SPI_FREQUENCY_HZ: u32 = 2_000_000;

/// I2C bus frequency for the LCD backpack
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// PCF8574 LCD backpack I2C address
pub const LCD_I2C_ADDR: u8 = 0x27;

/// LCD columns
pub const LCD_COLUMNS: u8 = 16;

/// LCD rows
pub const LCD_ROWS: u8 = 2;

/// Watchdog timeout; one control loop pass must complete within this window
pub const WATCHDOG_TIMEOUT_US: u32 = 4_000_000;

/// Flash offset of the settings record (last 2 KiB page of a 512 KiB part)
pub const SETTINGS_FLASH_OFFSET: u32 = 0x7_F800;

/// Flash page size used for the settings record
pub const SETTINGS_FLASH_PAGE: u32 = 0x800;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the front-panel wiring

    /// Encoder phase A (falling edge interrupt)
    pub const ENCODER_A: &str = "PA0";

    /// Encoder phase B (direction sense)
    pub const ENCODER_B: &str = "PA1";

    /// Encoder push button (active low)
    pub const ENCODER_SW: &str = "PA2";

    /// Select push button (active low)
    pub const SELECT_SW: &str = "PA3";

    /// Output relay (high selects the TTL path)
    pub const RELAY: &str = "PB0";

    /// Buzzer (active high)
    pub const BUZZER: &str = "PC0";

    /// AD9833 chip select
    pub const DDS_CS: &str = "PA4";

    /// AD5452 chip select
    pub const DAC_CS: &str = "PB1";

    /// SPI1 clock
    pub const SPI_SCK: &str = "PA5";

    /// SPI1 MOSI
    pub const SPI_MOSI: &str = "PA7";

    /// I2C1 SCL (LCD backpack)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (LCD backpack)
    pub const I2C1_SDA: &str = "PB9";
}
