//! Shared types used across the function generator firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use crate::config::{MAX_FREQUENCY_HZ, MAX_FREQUENCY_TTL_HZ};

/// Output waveform produced by the DDS
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Waveform {
    /// Sine wave through the level attenuator
    #[default]
    Sine,
    /// Square wave on the fixed 5 V TTL path (level not adjustable)
    Square,
    /// Triangle wave through the level attenuator
    Triangle,
}

impl Waveform {
    /// Next waveform for one left detent (Sine, Square, Triangle, Sine, ...)
    #[must_use]
    pub const fn next_left(self) -> Self {
        match self {
            Self::Sine => Self::Square,
            Self::Square => Self::Triangle,
            Self::Triangle => Self::Sine,
        }
    }

    /// Next waveform for one right detent (Sine, Triangle, Square, Sine, ...)
    #[must_use]
    pub const fn next_right(self) -> Self {
        match self {
            Self::Sine => Self::Triangle,
            Self::Triangle => Self::Square,
            Self::Square => Self::Sine,
        }
    }

    /// Cycle one detent in the given direction
    #[must_use]
    pub const fn rotate(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Left => self.next_left(),
            Rotation::Right => self.next_right(),
        }
    }

    /// Highest frequency this waveform may be driven at
    #[must_use]
    pub const fn max_frequency_hz(self) -> u32 {
        match self {
            Self::Square => MAX_FREQUENCY_TTL_HZ,
            Self::Sine | Self::Triangle => MAX_FREQUENCY_HZ,
        }
    }

    /// Whether the output is routed through the TTL relay path
    #[must_use]
    pub const fn is_ttl(self) -> bool {
        matches!(self, Self::Square)
    }

    /// Code used in the persisted settings record
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Sine => 1,
            Self::Square => 2,
            Self::Triangle => 3,
        }
    }

    /// Decode a persisted waveform code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Sine),
            2 => Some(Self::Square),
            3 => Some(Self::Triangle),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Waveform {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Sine => defmt::write!(f, "SINE"),
            Self::Square => defmt::write!(f, "SQUARE"),
            Self::Triangle => defmt::write!(f, "TRIANGLE"),
        }
    }
}

/// Unit the output level is entered and displayed in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LevelUnit {
    /// Root-mean-square volts
    Rms,
    /// Peak-to-peak volts
    #[default]
    PeakToPeak,
}

impl LevelUnit {
    /// The other unit
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Rms => Self::PeakToPeak,
            Self::PeakToPeak => Self::Rms,
        }
    }

    /// Three-character suffix shown after the level
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Rms => "Vrm",
            Self::PeakToPeak => "Vpp",
        }
    }

    /// Code used in the persisted settings record
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Rms => 0,
            Self::PeakToPeak => 1,
        }
    }

    /// Decode a persisted unit code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Rms),
            1 => Some(Self::PeakToPeak),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LevelUnit {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Rms => defmt::write!(f, "Vrms"),
            Self::PeakToPeak => defmt::write!(f, "Vpp"),
        }
    }
}

/// When edits reach the hardware
///
/// Chosen once at power-up and never changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditPolicy {
    /// Every encoder step is applied at once
    #[default]
    Immediate,
    /// Edits are applied only when the encoder button confirms them
    Confirm,
}

impl EditPolicy {
    /// Policy selected by the state of the encoder button at power-up
    #[must_use]
    pub const fn at_power_up(encoder_button_held: bool) -> Self {
        if encoder_button_held {
            Self::Confirm
        } else {
            Self::Immediate
        }
    }

    /// Check if edits wait for confirmation
    #[must_use]
    pub const fn needs_confirmation(self) -> bool {
        matches!(self, Self::Confirm)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for EditPolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Immediate => defmt::write!(f, "immediate"),
            Self::Confirm => defmt::write!(f, "confirm"),
        }
    }
}

/// One encoder detent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// Counter-clockwise (decrement)
    Left,
    /// Clockwise (increment)
    Right,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Rotation {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Left => defmt::write!(f, "L"),
            Self::Right => defmt::write!(f, "R"),
        }
    }
}

/// Encoder push-button event, reported on release
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonEvent {
    /// Nothing happened
    #[default]
    Idle,
    /// Released before the long-press threshold
    ShortPress,
    /// Released after the long-press threshold
    LongPress,
}

impl ButtonEvent {
    /// Check if this is any kind of press
    #[must_use]
    pub const fn is_press(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ButtonEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "idle"),
            Self::ShortPress => defmt::write!(f, "short"),
            Self::LongPress => defmt::write!(f, "long"),
        }
    }
}

/// Level step size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepSize {
    /// 0.10 V per detent
    Large,
    /// 0.01 V per detent
    Small,
}

impl StepSize {
    /// Step in centivolts
    #[must_use]
    pub const fn centivolts(self) -> u16 {
        match self {
            Self::Large => 10,
            Self::Small => 1,
        }
    }

    /// Switch between large and small steps
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Large => Self::Small,
            Self::Small => Self::Large,
        }
    }

    /// LCD column of the digit this step changes
    #[must_use]
    pub const fn cursor_column(self) -> u8 {
        match self {
            Self::Large => 11,
            Self::Small => 12,
        }
    }
}

/// Decimal place the encoder edits in the frequency field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitPlace {
    /// 1 Hz
    Hz1,
    /// 10 Hz
    Hz10,
    /// 100 Hz
    Hz100,
    /// 1 kHz
    KHz1,
    /// 10 kHz
    KHz10,
    /// 100 kHz
    KHz100,
}

impl DigitPlace {
    /// Get the place value in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::Hz1 => 1,
            Self::Hz10 => 10,
            Self::Hz100 => 100,
            Self::KHz1 => 1_000,
            Self::KHz10 => 10_000,
            Self::KHz100 => 100_000,
        }
    }

    /// Starting place when frequency editing begins
    #[must_use]
    pub const fn initial_for(frequency_hz: u32) -> Self {
        if frequency_hz >= 1_000_000 {
            Self::KHz100
        } else {
            Self::KHz1
        }
    }

    /// Move to the next larger place (stops at 100 kHz)
    #[must_use]
    pub const fn next_larger(self) -> Self {
        match self {
            Self::Hz1 => Self::Hz10,
            Self::Hz10 => Self::Hz100,
            Self::Hz100 => Self::KHz1,
            Self::KHz1 => Self::KHz10,
            Self::KHz10 | Self::KHz100 => Self::KHz100,
        }
    }

    /// Move to the next smaller place (stops at 1 Hz)
    #[must_use]
    pub const fn next_smaller(self) -> Self {
        match self {
            Self::Hz1 | Self::Hz10 => Self::Hz1,
            Self::Hz100 => Self::Hz10,
            Self::KHz1 => Self::Hz100,
            Self::KHz10 => Self::KHz1,
            Self::KHz100 => Self::KHz10,
        }
    }

    /// Move one place for a detent: left goes up, right goes down
    #[must_use]
    pub const fn rotate(self, rotation: Rotation) -> Self {
        match rotation {
            Rotation::Left => self.next_larger(),
            Rotation::Right => self.next_smaller(),
        }
    }

    /// LCD column of this digit on the frequency line
    #[must_use]
    pub const fn cursor_column(self) -> u8 {
        match self {
            Self::Hz1 => 12,
            Self::Hz10 => 11,
            Self::Hz100 => 10,
            Self::KHz1 => 8,
            Self::KHz10 => 7,
            Self::KHz100 => 6,
        }
    }

    /// Leading-zero policy while this digit is being changed
    ///
    /// High places must stay visible even when they are zero.
    #[must_use]
    pub const fn leading_zeros(self) -> LeadingZeros {
        match self {
            Self::KHz10 => LeadingZeros::TenKilo,
            Self::KHz100 => LeadingZeros::HundredKilo,
            Self::Hz1 | Self::Hz10 | Self::Hz100 | Self::KHz1 => LeadingZeros::Suppress,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DigitPlace {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}Hz", self.as_hz());
    }
}

/// Which leading zeros of the frequency field are printed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LeadingZeros {
    /// Blank every leading zero
    #[default]
    Suppress,
    /// Print zeros from the 10 kHz digit down
    TenKilo,
    /// Print zeros from the 100 kHz digit down
    HundredKilo,
}

/// LCD cursor appearance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// No cursor
    #[default]
    Hidden,
    /// Steady underline: selecting a digit
    Underline,
    /// Blinking block: changing a value
    Blink,
}
