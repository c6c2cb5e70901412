//! DDS Function Generator Firmware Library
//!
//! Front-panel firmware for a benchtop function generator built around an
//! AD9833 DDS, an AD5452 level DAC, a 16x2 character LCD, a rotary encoder
//! with push-button, a select button, an output relay and a buzzer, running
//! on an STM32G474.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     FRONT PANEL (core)                       │
//! │  mode + edit buffers  │  commit rules  │  idle timeout       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                        DOMAIN                                │
//! │  Settings model  │  level arithmetic  │  input classifiers   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  DRIVERS (embedded-hal 1.0)                  │
//! │  AD9833  │  AD5452  │  relay  │  buzzer  │  HD44780 LCD      │
//! ├─────────────────────────────────────────────────────────────┤
//! │              HAL (embassy-stm32, `embedded` only)            │
//! │  panel buttons  │  encoder counters  │  flash settings page  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: the panel logic only talks to
//!   capability traits, so it runs unchanged against host fakes
//! - **Model first**: settings are updated and re-clamped before any
//!   hardware or storage write
//! - **No unsafe in application code**
//! - **Explicit error handling**: bus and storage failures return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

// Re-export dependencies needed by the firmware binary
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// STM32G474 panel inputs and flash-backed settings.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// AD9833, AD5452, relay, buzzer and character LCD.
pub mod drivers;

/// Front-panel state machine and the capabilities it drives
pub mod panel;

/// Committed settings and their persistence
pub mod settings;

/// Output level bounds and unit conversion
pub mod level;

/// Encoder, button and idle-clock input processing
pub mod input;

/// Error type shared by drivers and stores
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::error::{Error, Result};
    pub use crate::panel::{Beeper, FrontPanel, Generator, Instrument, PanelDisplay, PanelInput};
    pub use crate::settings::{Settings, SettingsStore};

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};
}
