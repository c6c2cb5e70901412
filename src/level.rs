//! Output Level Arithmetic
//!
//! Bounds and unit conversion for the output level. Levels are integer
//! centivolts throughout; the attenuator hardware tops out at
//! [`LEVEL_VPP_MAX`] peak-to-peak, which fixes a different RMS ceiling for
//! each waveform shape.
//!
//! The two conversion directions round differently: going to peak-to-peak
//! adds 0.8 before truncating, going to RMS truncates. Both results are
//! clamped into the target unit's bounds.

use crate::config::{LEVEL_RMS_MIN, LEVEL_VPP_MAX, LEVEL_VPP_MIN};
use crate::types::{LevelUnit, Waveform};

/// Square root of two, as used by the panel arithmetic
pub const SQRT2: f64 = 1.41421;

/// Square root of three, as used by the panel arithmetic
pub const SQRT3: f64 = 1.73205;

/// Bias added when converting RMS to peak-to-peak
const TO_PEAK_TO_PEAK_BIAS: f64 = 0.8;

/// Bias added when the DAC driver converts RMS to peak-to-peak
const DAC_ROUNDING_BIAS: f64 = 0.5;

/// Ratio of peak-to-peak to RMS for a waveform shape
///
/// Sine is `2 * sqrt(2)`, triangle is `2 * sqrt(3)`. Square has no
/// adjustable level; it takes the sine ratio so its RMS bounds are the
/// widest ones and a level parked under square is never clamped.
#[must_use]
pub fn peak_to_peak_per_rms(waveform: Waveform) -> f64 {
    match waveform {
        Waveform::Sine | Waveform::Square => 2.0 * SQRT2,
        Waveform::Triangle => 2.0 * SQRT3,
    }
}

/// Highest RMS level reachable with `waveform`
#[must_use]
pub fn rms_max(waveform: Waveform) -> u16 {
    (f64::from(LEVEL_VPP_MAX) / peak_to_peak_per_rms(waveform)) as u16
}

/// Closed range of legal levels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelBounds {
    /// Lowest legal level in centivolts
    pub min: u16,
    /// Highest legal level in centivolts
    pub max: u16,
}

impl LevelBounds {
    /// Bounds for a unit and waveform
    #[must_use]
    pub fn for_unit(unit: LevelUnit, waveform: Waveform) -> Self {
        match unit {
            LevelUnit::PeakToPeak => Self {
                min: LEVEL_VPP_MIN,
                max: LEVEL_VPP_MAX,
            },
            LevelUnit::Rms => Self {
                min: LEVEL_RMS_MIN,
                max: rms_max(waveform),
            },
        }
    }

    /// Check if a level lies inside the bounds
    #[must_use]
    pub const fn contains(&self, level: u16) -> bool {
        level >= self.min && level <= self.max
    }

    /// Clamp a level into the bounds
    #[must_use]
    pub fn clamp(&self, level: u16) -> u16 {
        level.clamp(self.min, self.max)
    }

    /// Apply one signed step, rejecting results outside the bounds
    #[must_use]
    pub fn step(&self, level: u16, delta: i32) -> Option<u16> {
        let candidate = i32::from(level) + delta;
        u16::try_from(candidate)
            .ok()
            .filter(|&value| self.contains(value))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LevelBounds {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[{}..={}]", self.min, self.max);
    }
}

/// Convert a peak-to-peak level to RMS (truncating)
#[must_use]
pub fn to_rms(peak_to_peak: u16, waveform: Waveform) -> u16 {
    (f64::from(peak_to_peak) / peak_to_peak_per_rms(waveform)) as u16
}

/// Convert an RMS level to peak-to-peak (biased by +0.8 before truncating)
#[must_use]
pub fn to_peak_to_peak(rms: u16, waveform: Waveform) -> u16 {
    (f64::from(rms) * peak_to_peak_per_rms(waveform) + TO_PEAK_TO_PEAK_BIAS) as u16
}

/// Re-express `level` in `to` and clamp it into that unit's bounds
#[must_use]
pub fn convert(level: u16, from: LevelUnit, to: LevelUnit, waveform: Waveform) -> u16 {
    let converted = match (from, to) {
        (LevelUnit::PeakToPeak, LevelUnit::Rms) => to_rms(level, waveform),
        (LevelUnit::Rms, LevelUnit::PeakToPeak) => to_peak_to_peak(level, waveform),
        _ => level,
    };
    LevelBounds::for_unit(to, waveform).clamp(converted)
}

/// Peak-to-peak amplitude the attenuator must produce for a committed level
///
/// RMS levels are converted with round-to-nearest and the result is capped at
/// the hardware limit.
#[must_use]
pub fn attenuator_vpp(level: u16, waveform: Waveform, unit: LevelUnit) -> u16 {
    let vpp = match unit {
        LevelUnit::PeakToPeak => level,
        LevelUnit::Rms => {
            (f64::from(level) * peak_to_peak_per_rms(waveform) + DAC_ROUNDING_BIAS) as u16
        }
    };
    vpp.min(LEVEL_VPP_MAX)
}
