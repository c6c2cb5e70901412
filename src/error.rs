//! Error types for the instrument's collaborators.

use core::fmt;

use embedded_hal::{i2c, spi};

/// Errors reported by output drivers and the settings store.
///
/// Out-of-range edits are not errors: the front panel rejects them (silently
/// or with a beep) and keeps the previous value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// SPI transfer to the DDS or level DAC failed.
    Spi(spi::ErrorKind),

    /// I2C transfer to the LCD backpack failed.
    I2c(i2c::ErrorKind),

    /// A GPIO output (chip select, relay, buzzer) could not be driven.
    Pin,

    /// Non-volatile settings could not be read or written.
    Storage,
}

impl Error {
    /// Wrap an SPI bus error.
    pub fn spi<E: spi::Error>(error: E) -> Self {
        Self::Spi(error.kind())
    }

    /// Wrap an I2C bus error.
    pub fn i2c<E: i2c::Error>(error: E) -> Self {
        Self::I2c(error.kind())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(kind) => write!(f, "SPI error: {kind:?}"),
            Self::I2c(kind) => write!(f, "I2C error: {kind:?}"),
            Self::Pin => write!(f, "GPIO output error"),
            Self::Storage => write!(f, "settings storage error"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Spi(kind) => defmt::write!(f, "SPI error: {}", kind),
            Self::I2c(kind) => defmt::write!(f, "I2C error: {}", kind),
            Self::Pin => defmt::write!(f, "GPIO output error"),
            Self::Storage => defmt::write!(f, "Storage error"),
        }
    }
}

/// Result alias used by every collaborator operation.
pub type Result<T> = core::result::Result<T, Error>;
