//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --test config_tests

use dds_funcgen::config::*;
use dds_funcgen::level::{rms_max, LevelBounds};
use dds_funcgen::types::{LevelUnit, Waveform};

// =============================================================================
// Timing Tests
// =============================================================================

#[test]
fn idle_clock_is_about_one_second() {
    let second_ms = IDLE_TICK_MS * u64::from(IDLE_TICKS_PER_SECOND);
    assert!((950..=1050).contains(&second_ms));
}

#[test]
fn idle_timeout_fits_counter() {
    assert!(MAX_IDLE_SECONDS > 0);
    assert!(MAX_IDLE_SECONDS < u8::MAX);
}

#[test]
fn long_press_shorter_than_stuck_limit() {
    assert!(BUTTON_DEBOUNCE_MS < LONG_PRESS_MS);
    assert!(LONG_PRESS_MS < MAX_PRESS_MS);
}

#[test]
fn beeps_shorter_than_watchdog() {
    let longest_pass_us = u32::from(CONFIRM_BEEP_MS) * 1000 * 2 + RELAY_SETTLE_MS * 1000;
    assert!(longest_pass_us < WATCHDOG_TIMEOUT_US);
    assert!(REJECT_BEEP_MS < CONFIRM_BEEP_MS);
}

// =============================================================================
// Frequency and Level Limits
// =============================================================================

#[test]
fn frequency_limits_ordered() {
    assert!(MIN_FREQUENCY_HZ <= DEFAULT_FREQUENCY_HZ);
    assert!(DEFAULT_FREQUENCY_HZ <= MAX_FREQUENCY_HZ);
    assert!(MAX_FREQUENCY_HZ < MAX_FREQUENCY_TTL_HZ);
    assert!(MAX_FREQUENCY_TTL_HZ < DDS_MCLK_HZ / 2);
}

#[test]
fn default_level_is_legal() {
    assert_eq!(DEFAULT_LEVEL_UNIT, LevelUnit::PeakToPeak);
    for waveform in [Waveform::Sine, Waveform::Triangle] {
        assert!(LevelBounds::for_unit(DEFAULT_LEVEL_UNIT, waveform).contains(DEFAULT_LEVEL));
    }
}

#[test]
fn rms_ceiling_below_peak_to_peak_ceiling() {
    assert!(rms_max(Waveform::Sine) < LEVEL_VPP_MAX);
    assert!(rms_max(Waveform::Triangle) < rms_max(Waveform::Sine));
    assert!(LEVEL_RMS_MIN <= rms_max(Waveform::Triangle));
}

// =============================================================================
// Hardware Tests
// =============================================================================

#[test]
fn lcd_geometry() {
    assert_eq!(LCD_COLUMNS, 16);
    assert_eq!(LCD_ROWS, 2);
    // PCF8574 (0x20..0x27) or PCF8574A (0x38..0x3F)
    assert!((0x20..=0x27).contains(&LCD_I2C_ADDR) || (0x38..=0x3F).contains(&LCD_I2C_ADDR));
}

#[test]
fn settings_page_inside_flash() {
    // STM32G474RE: 512 KiB flash, 2 KiB pages
    assert_eq!(SETTINGS_FLASH_OFFSET % SETTINGS_FLASH_PAGE, 0);
    assert!(SETTINGS_FLASH_OFFSET + SETTINGS_FLASH_PAGE <= 512 * 1024);
}

#[test]
fn pins_do_not_overlap() {
    let all = [
        pins::ENCODER_A,
        pins::ENCODER_B,
        pins::ENCODER_SW,
        pins::SELECT_SW,
        pins::RELAY,
        pins::BUZZER,
        pins::DDS_CS,
        pins::DAC_CS,
        pins::SPI_SCK,
        pins::SPI_MOSI,
        pins::I2C1_SCL,
        pins::I2C1_SDA,
    ];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
