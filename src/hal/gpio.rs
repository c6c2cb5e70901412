//! Panel Inputs
//!
//! The select and encoder buttons are active low with internal pull-ups and
//! are sampled from the control loop. Encoder detents and the idle clock
//! arrive through the shared [`PulseCounters`], fed by their own tasks.

use embassy_stm32::gpio::Input;
use embassy_time::Instant;

use crate::input::{Debouncer, PressClassifier, PulseCounters};
use crate::panel::PanelInput;
use crate::types::{ButtonEvent, EditPolicy, Rotation};

/// Front-panel buttons plus the shared encoder and idle counters
pub struct PanelButtons<'d> {
    select: Input<'d>,
    encoder: Input<'d>,
    select_debounce: Debouncer,
    encoder_press: PressClassifier,
    counters: &'static PulseCounters,
}

impl<'d> PanelButtons<'d> {
    /// Wrap the button inputs
    #[must_use]
    pub fn new(select: Input<'d>, encoder: Input<'d>, counters: &'static PulseCounters) -> Self {
        Self {
            select,
            encoder,
            select_debounce: Debouncer::new(),
            encoder_press: PressClassifier::new(),
            counters,
        }
    }

    /// Editing policy selected by holding the encoder button at power-up
    #[must_use]
    pub fn sense_policy(&self) -> EditPolicy {
        EditPolicy::at_power_up(self.encoder.is_low())
    }

    /// Check if the encoder button is held right now (undebounced)
    #[must_use]
    pub fn encoder_held(&self) -> bool {
        self.encoder.is_low()
    }
}

/// Milliseconds since boot, wrapping
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

impl PanelInput for PanelButtons<'_> {
    fn select_pressed(&mut self) -> bool {
        self.select_debounce.pressed_edge(self.select.is_low(), now_ms())
    }

    fn encoder_button(&mut self) -> ButtonEvent {
        let event = self.encoder_press.update(self.encoder.is_low(), now_ms());
        if event.is_press() {
            trace!("encoder button: {}", event);
        }
        event
    }

    fn rotation(&mut self) -> Option<Rotation> {
        self.counters.take_rotation()
    }

    fn idle_seconds(&self) -> u8 {
        self.counters.idle_seconds()
    }

    fn restart_idle_timer(&mut self) {
        self.counters.restart_idle();
    }

    fn discard_rotation(&mut self) {
        self.counters.clear_rotation();
    }
}
