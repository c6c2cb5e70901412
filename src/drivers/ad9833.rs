//! `AD9833` DDS Register Encoding
//!
//! The `AD9833` takes 16-bit words, high byte first. A control word (top two
//! bits clear) selects waveform, reset and sleep state; frequency words carry
//! a register prefix and 14 data bits, so a 28-bit tuning word takes two
//! writes with `B28` set in the control register.
//!
//! Everything here is pure: [`super::generator::SignalChain`] clocks the
//! words out.

use crate::config::DDS_MCLK_HZ;
use crate::types::Waveform;

/// Control register bit positions
mod bit {
    pub const MODE: u16 = 1 << 1;
    pub const DIV2: u16 = 1 << 3;
    pub const OPBITEN: u16 = 1 << 5;
    pub const SLEEP1: u16 = 1 << 7;
    pub const RESET: u16 = 1 << 8;
    pub const B28: u16 = 1 << 13;
}

/// Register select prefix for `FREQ0`
const FREQ0: u16 = 0x4000;

/// Data bits carried by one frequency write
const FREQ_DATA_MASK: u32 = 0x3FFF;

/// Width of the phase accumulator
const ACCUMULATOR_BITS: u32 = 28;

/// Output off: accumulator held in reset, internal clock stopped, DAC
/// disconnected
pub const RESET_WORD: u16 = bit::B28 | bit::RESET | bit::SLEEP1 | bit::OPBITEN | bit::MODE;

/// Same as [`RESET_WORD`] with the accumulator released
pub const OFF_WORD: u16 = RESET_WORD & !bit::RESET;

/// Control word selecting `waveform` with the output running
#[must_use]
pub const fn control_word(waveform: Waveform) -> u16 {
    match waveform {
        Waveform::Sine => bit::B28,
        Waveform::Square => bit::B28 | bit::OPBITEN | bit::DIV2,
        Waveform::Triangle => bit::B28 | bit::MODE,
    }
}

/// 28-bit tuning word for `frequency_hz`
#[must_use]
pub fn frequency_word(frequency_hz: u32) -> u32 {
    let word = (u64::from(frequency_hz) << ACCUMULATOR_BITS) / u64::from(DDS_MCLK_HZ);
    (word as u32) & ((1 << ACCUMULATOR_BITS) - 1)
}

/// The two `FREQ0` writes for `frequency_hz`, low half first
#[must_use]
pub fn frequency_writes(frequency_hz: u32) -> [u16; 2] {
    let word = frequency_word(frequency_hz);
    [
        FREQ0 | (word & FREQ_DATA_MASK) as u16,
        FREQ0 | ((word >> 14) & FREQ_DATA_MASK) as u16,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_words_per_shape() {
        assert_eq!(control_word(Waveform::Sine), 0x2000);
        assert_eq!(control_word(Waveform::Square), 0x2028);
        assert_eq!(control_word(Waveform::Triangle), 0x2002);
    }

    #[test]
    fn reset_sequence_releases_accumulator() {
        assert_eq!(RESET_WORD, 0x21A2);
        assert_eq!(OFF_WORD, 0x20A2);
    }

    #[test]
    fn one_kilohertz_tuning() {
        // 1000 * 2^28 / 25e6 = 10737.41824
        assert_eq!(frequency_word(1_000), 10_737);
        assert_eq!(frequency_writes(1_000), [0x4000 | 10_737, 0x4000]);
    }
}
