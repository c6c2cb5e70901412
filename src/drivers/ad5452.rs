//! `AD5452` Level DAC Encoding
//!
//! The DAC's R-2R ladder sets the gain of the output amplifier, so full scale
//! corresponds to [`LEVEL_VPP_MAX`]. Words are 16 bits, high byte first: two
//! control bits (zero for a normal load), twelve data bits, two unused bits.

use crate::config::LEVEL_VPP_MAX;
use crate::level;
use crate::types::{LevelUnit, Waveform};

/// Largest 12-bit DAC code
pub const FULL_SCALE: u16 = 0x0FFF;

/// Control bits must be clear for a normal register load
const DATA_MASK: u16 = 0x3FFF;

/// 12-bit ladder setting for a peak-to-peak amplitude
#[must_use]
pub fn ladder_code(vpp: u16) -> u16 {
    let vpp = u32::from(vpp.min(LEVEL_VPP_MAX));
    (vpp * u32::from(FULL_SCALE) / u32::from(LEVEL_VPP_MAX)) as u16
}

/// SPI word loading the ladder for a committed level
#[must_use]
pub fn level_word(level: u16, waveform: Waveform, unit: LevelUnit) -> u16 {
    let vpp = level::attenuator_vpp(level, waveform, unit);
    (ladder_code(vpp) << 2) & DATA_MASK
}
