//! Peripheral Drivers
//!
//! Drivers for the external ICs on the generator board. Each is generic over
//! the `embedded-hal` 1.0 traits, so the same code runs against the STM32
//! peripherals on target and against recording fakes on the host.

pub mod ad5452;
pub mod ad9833;
pub mod buzzer;
pub mod generator;
pub mod lcd;
