//! Panel modes and their edit buffers.

use crate::types::{DigitPlace, Waveform};

/// Current front-panel mode
///
/// Each editing mode carries the edit buffer for its field: the pending value
/// the encoder changes before it is committed to the settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanelMode {
    /// Showing the committed settings, waiting for the select button
    #[default]
    Idle,
    /// Choosing the waveform
    EditWaveform {
        /// Waveform under selection
        pending: Waveform,
    },
    /// Adjusting the output level
    EditLevel {
        /// Level in centivolts, in the committed unit
        pending: u16,
    },
    /// Moving the cursor between frequency digits
    EditFrequencyDigit {
        /// Frequency in Hz
        pending: u32,
        /// Digit under the cursor
        digit: DigitPlace,
    },
    /// Changing the frequency one digit place at a time
    EditFrequencyValue {
        /// Frequency in Hz
        pending: u32,
        /// Digit the encoder changes
        digit: DigitPlace,
    },
}

impl PanelMode {
    /// Check if no field is being edited
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PanelMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::EditWaveform { pending } => defmt::write!(f, "EditWaveform({})", pending),
            Self::EditLevel { pending } => defmt::write!(f, "EditLevel({})", pending),
            Self::EditFrequencyDigit { pending, digit } => {
                defmt::write!(f, "EditFrequencyDigit({}, {})", pending, digit);
            }
            Self::EditFrequencyValue { pending, digit } => {
                defmt::write!(f, "EditFrequencyValue({}, {})", pending, digit);
            }
        }
    }
}
