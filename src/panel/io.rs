//! Front-Panel Collaborators
//!
//! Capabilities the front-panel state machine drives. The state machine only
//! decides what the hardware should be doing and when; the implementations
//! handle register encoding, bus traffic and character rendering.

use crate::error::Result;
use crate::settings::SettingsStore;
use crate::types::{ButtonEvent, CursorMode, LeadingZeros, LevelUnit, Rotation, Waveform};

/// Source of debounced front-panel events
pub trait PanelInput {
    /// Report a select-button press edge (consumes it)
    fn select_pressed(&mut self) -> bool;

    /// Report a completed encoder-button press (consumes it)
    fn encoder_button(&mut self) -> ButtonEvent;

    /// Consume at most one buffered encoder detent
    fn rotation(&mut self) -> Option<Rotation>;

    /// Whole seconds since the idle timer was last restarted
    fn idle_seconds(&self) -> u8;

    /// Restart the idle timer
    fn restart_idle_timer(&mut self);

    /// Drop every buffered encoder detent
    fn discard_rotation(&mut self);
}

/// DDS, level attenuator and output relay
pub trait Generator {
    /// Select the DDS output waveform
    fn set_waveform(&mut self, waveform: Waveform) -> Result<()>;

    /// Program the DDS frequency
    fn set_frequency(&mut self, frequency_hz: u32) -> Result<()>;

    /// Program the level attenuator
    fn set_level(&mut self, level: u16, waveform: Waveform, unit: LevelUnit) -> Result<()>;

    /// Route the output through the TTL path (`true`) or the attenuator
    fn set_relay(&mut self, ttl: bool) -> Result<()>;
}

/// Audible feedback
pub trait Beeper {
    /// Sound the buzzer for a fixed duration, blocking until done
    fn beep(&mut self, duration_ms: u16) -> Result<()>;
}

/// Two-line character display
pub trait PanelDisplay {
    /// Render the frequency field
    fn show_frequency(&mut self, frequency_hz: u32, zeros: LeadingZeros) -> Result<()>;

    /// Render the waveform field
    fn show_waveform(&mut self, waveform: Waveform) -> Result<()>;

    /// Render the level field
    fn show_level(&mut self, level: u16, unit: LevelUnit) -> Result<()>;

    /// Move the cursor
    fn set_cursor(&mut self, column: u8, row: u8) -> Result<()>;

    /// Change the cursor appearance
    fn set_cursor_mode(&mut self, mode: CursorMode) -> Result<()>;
}

/// Everything the front panel commands, owned in one place
pub struct Instrument<G, D, B, S> {
    /// Signal generation hardware
    pub generator: G,
    /// Character display
    pub display: D,
    /// Buzzer
    pub beeper: B,
    /// Settings persistence
    pub store: S,
}

impl<G, D, B, S> Instrument<G, D, B, S>
where
    G: Generator,
    D: PanelDisplay,
    B: Beeper,
    S: SettingsStore,
{
    /// Bundle the collaborators
    pub const fn new(generator: G, display: D, beeper: B, store: S) -> Self {
        Self {
            generator,
            display,
            beeper,
            store,
        }
    }
}
