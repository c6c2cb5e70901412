//! Front-Panel State Machine
//!
//! One [`FrontPanel::poll`] call handles at most one input event. The
//! idle timeout is checked first; after that each editing mode looks at the
//! encoder rotation, then the encoder button, then the select button.
//!
//! Commits update the [`Settings`] model before any hardware or storage is
//! touched, and are skipped entirely when the value is unchanged. Leaving the
//! frequency modes never leaves a zero frequency committed: it is replaced by
//! the default, written through and announced with a confirmation beep.

use super::io::{Beeper, Generator, Instrument, PanelDisplay, PanelInput};
use super::mode::PanelMode;
use crate::config::{CONFIRM_BEEP_MS, DEFAULT_LEVEL_STEP, MAX_IDLE_SECONDS, REJECT_BEEP_MS};
use crate::error::Result;
use crate::settings::{SettingValue, Settings, SettingsStore, StoredSettings};
use crate::types::{
    ButtonEvent, CursorMode, DigitPlace, EditPolicy, LeadingZeros, Rotation, StepSize, Waveform,
};

/// Display row of the frequency field
const FREQUENCY_ROW: u8 = 0;

/// Display row of the waveform and level fields
const WAVEFORM_ROW: u8 = 1;

/// Cursor column while choosing the waveform
const WAVEFORM_COLUMN: u8 = 0;

/// The front panel: committed settings, the current mode and the hardware it drives
pub struct FrontPanel<G, D, B, S> {
    hw: Instrument<G, D, B, S>,
    settings: Settings,
    mode: PanelMode,
    policy: EditPolicy,
    step: StepSize,
}

impl<G, D, B, S> FrontPanel<G, D, B, S>
where
    G: Generator,
    D: PanelDisplay,
    B: Beeper,
    S: SettingsStore,
{
    /// Restore the persisted settings and bring the output up
    ///
    /// Invalid stored fields fall back to their defaults; an unreadable store
    /// behaves like an erased one. The level DAC is programmed before the
    /// relay closes onto the output, and the DDS waveform is selected last,
    /// once its frequency is in place.
    pub fn boot(mut hw: Instrument<G, D, B, S>, policy: EditPolicy) -> Result<Self> {
        let stored = hw.store.load().unwrap_or_else(|error| {
            warn!("settings: load failed ({}), using defaults", error);
            StoredSettings::ERASED
        });
        let (settings, substituted) = Settings::from_stored(&stored);
        if substituted.any() {
            warn!(
                "settings: defaults substituted (waveform={} frequency={} level={} unit={})",
                substituted.waveform,
                substituted.frequency,
                substituted.level,
                substituted.unit
            );
        }
        info!("boot: {} policy={}", settings, policy);

        let waveform = settings.waveform();
        hw.generator
            .set_level(settings.level(), waveform, settings.unit())?;
        hw.display.set_cursor_mode(CursorMode::Hidden)?;
        hw.display
            .show_frequency(settings.frequency_hz(), LeadingZeros::Suppress)?;
        hw.display.show_waveform(waveform)?;
        if !waveform.is_ttl() {
            hw.display.show_level(settings.level(), settings.unit())?;
        }
        hw.generator.set_relay(waveform.is_ttl())?;
        hw.generator.set_frequency(settings.frequency_hz())?;
        hw.generator.set_waveform(waveform)?;

        Ok(Self {
            hw,
            settings,
            mode: PanelMode::Idle,
            policy,
            step: DEFAULT_LEVEL_STEP,
        })
    }

    /// Committed settings
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current mode, including any pending edit
    #[must_use]
    pub const fn mode(&self) -> PanelMode {
        self.mode
    }

    /// Editing policy chosen at power-up
    #[must_use]
    pub const fn policy(&self) -> EditPolicy {
        self.policy
    }

    /// Current level step size
    #[must_use]
    pub const fn step(&self) -> StepSize {
        self.step
    }

    /// Borrow the collaborators
    #[must_use]
    pub const fn hw(&self) -> &Instrument<G, D, B, S> {
        &self.hw
    }

    /// Mutably borrow the collaborators
    pub fn hw_mut(&mut self) -> &mut Instrument<G, D, B, S> {
        &mut self.hw
    }

    /// Handle at most one pending input event
    pub fn poll<I: PanelInput>(&mut self, input: &mut I) -> Result<()> {
        if !self.mode.is_idle() && input.idle_seconds() >= MAX_IDLE_SECONDS {
            return self.idle_timeout();
        }

        match self.mode {
            PanelMode::Idle => self.poll_idle(input),
            PanelMode::EditWaveform { pending } => self.poll_waveform(input, pending),
            PanelMode::EditLevel { pending } => self.poll_level(input, pending),
            PanelMode::EditFrequencyDigit { pending, digit } => {
                self.poll_frequency_digit(input, pending, digit)
            }
            PanelMode::EditFrequencyValue { pending, digit } => {
                self.poll_frequency_value(input, pending, digit)
            }
        }
    }

    fn poll_idle<I: PanelInput>(&mut self, input: &mut I) -> Result<()> {
        if input.select_pressed() {
            return self.enter_waveform(input);
        }
        // Encoder presses mean nothing while idle.
        let _ = input.encoder_button();
        Ok(())
    }

    fn poll_waveform<I: PanelInput>(&mut self, input: &mut I, pending: Waveform) -> Result<()> {
        if let Some(rotation) = input.rotation() {
            input.restart_idle_timer();
            let pending = pending.rotate(rotation);
            self.mode = PanelMode::EditWaveform { pending };

            if self.policy.needs_confirmation() {
                self.hw.display.show_waveform(pending)?;
                if !pending.is_ttl() {
                    self.hw
                        .display
                        .show_level(self.settings.level(), self.settings.unit())?;
                }
                return self.hw.display.set_cursor(WAVEFORM_COLUMN, WAVEFORM_ROW);
            }
            return self.commit_waveform(pending);
        }

        if input.encoder_button().is_press() {
            input.restart_idle_timer();
            return self.commit_waveform(pending);
        }

        if input.select_pressed() {
            input.restart_idle_timer();
            let committed = self.settings.waveform();
            if pending != committed {
                self.hw.display.show_waveform(committed)?;
            }
            if committed.is_ttl() {
                return self.enter_frequency_digit();
            }
            return self.enter_level();
        }

        Ok(())
    }

    fn poll_level<I: PanelInput>(&mut self, input: &mut I, pending: u16) -> Result<()> {
        if let Some(rotation) = input.rotation() {
            input.restart_idle_timer();
            let delta = i32::from(self.step.centivolts());
            let delta = match rotation {
                Rotation::Left => -delta,
                Rotation::Right => delta,
            };

            let pending = match self.settings.level_bounds().step(pending, delta) {
                Some(level) => level,
                None => {
                    self.hw.beeper.beep(REJECT_BEEP_MS)?;
                    pending
                }
            };
            self.mode = PanelMode::EditLevel { pending };

            self.hw.display.show_level(pending, self.settings.unit())?;
            self.hw
                .display
                .set_cursor(self.step.cursor_column(), WAVEFORM_ROW)?;
            if !self.policy.needs_confirmation() {
                self.commit_level(pending)?;
            }
            return Ok(());
        }

        let event = input.encoder_button();
        if event.is_press() {
            input.restart_idle_timer();
            if self.policy.needs_confirmation() && pending != self.settings.level() {
                self.commit_level(pending)?;
                return self.hw.beeper.beep(CONFIRM_BEEP_MS);
            }
            if event == ButtonEvent::LongPress {
                return self.toggle_unit();
            }
            self.step = self.step.toggle();
            debug!("level step: {} cV", self.step.centivolts());
            return self
                .hw
                .display
                .set_cursor(self.step.cursor_column(), WAVEFORM_ROW);
        }

        if input.select_pressed() {
            input.restart_idle_timer();
            self.commit_level(pending)?;
            return self.enter_frequency_digit();
        }

        Ok(())
    }

    fn poll_frequency_digit<I: PanelInput>(
        &mut self,
        input: &mut I,
        pending: u32,
        digit: DigitPlace,
    ) -> Result<()> {
        if let Some(rotation) = input.rotation() {
            input.restart_idle_timer();
            let digit = digit.rotate(rotation);
            self.mode = PanelMode::EditFrequencyDigit { pending, digit };
            return self
                .hw
                .display
                .set_cursor(digit.cursor_column(), FREQUENCY_ROW);
        }

        if input.encoder_button().is_press() {
            input.restart_idle_timer();
            self.mode = PanelMode::EditFrequencyValue { pending, digit };
            let zeros = digit.leading_zeros();
            if zeros != LeadingZeros::Suppress {
                self.hw.display.show_frequency(pending, zeros)?;
            }
            self.hw
                .display
                .set_cursor(digit.cursor_column(), FREQUENCY_ROW)?;
            return self.hw.display.set_cursor_mode(CursorMode::Blink);
        }

        if input.select_pressed() {
            return self.return_to_waveform(input);
        }

        Ok(())
    }

    fn poll_frequency_value<I: PanelInput>(
        &mut self,
        input: &mut I,
        pending: u32,
        digit: DigitPlace,
    ) -> Result<()> {
        if let Some(rotation) = input.rotation() {
            input.restart_idle_timer();
            let candidate = match rotation {
                Rotation::Left => pending.checked_sub(digit.as_hz()),
                Rotation::Right => pending
                    .checked_add(digit.as_hz())
                    .filter(|&hz| hz <= self.settings.max_frequency_hz()),
            };
            let pending = candidate.unwrap_or(pending);
            self.mode = PanelMode::EditFrequencyValue { pending, digit };

            self.hw
                .display
                .show_frequency(pending, digit.leading_zeros())?;
            self.hw
                .display
                .set_cursor(digit.cursor_column(), FREQUENCY_ROW)?;
            if !self.policy.needs_confirmation() {
                self.commit_frequency(pending)?;
            }
            return Ok(());
        }

        if input.encoder_button().is_press() {
            input.restart_idle_timer();
            if self.policy.needs_confirmation() && pending != self.settings.frequency_hz() {
                self.commit_frequency(pending)?;
                self.hw.beeper.beep(CONFIRM_BEEP_MS)?;
            }
            let committed = self.settings.frequency_hz();
            self.mode = PanelMode::EditFrequencyDigit {
                pending: committed,
                digit,
            };
            self.hw
                .display
                .show_frequency(committed, LeadingZeros::Suppress)?;
            self.hw.display.set_cursor_mode(CursorMode::Underline)?;
            return self
                .hw
                .display
                .set_cursor(digit.cursor_column(), FREQUENCY_ROW);
        }

        if input.select_pressed() {
            if pending != 0 {
                self.commit_frequency(pending)?;
            }
            return self.return_to_waveform(input);
        }

        Ok(())
    }

    fn enter_waveform<I: PanelInput>(&mut self, input: &mut I) -> Result<()> {
        input.discard_rotation();
        input.restart_idle_timer();
        self.mode = PanelMode::EditWaveform {
            pending: self.settings.waveform(),
        };
        debug!("panel: {}", self.mode);
        self.hw.display.set_cursor(WAVEFORM_COLUMN, WAVEFORM_ROW)?;
        self.hw.display.set_cursor_mode(CursorMode::Blink)
    }

    fn enter_level(&mut self) -> Result<()> {
        let level = self.settings.level();
        self.mode = PanelMode::EditLevel { pending: level };
        debug!("panel: {}", self.mode);
        self.hw.display.show_level(level, self.settings.unit())?;
        self.hw
            .display
            .set_cursor(self.step.cursor_column(), WAVEFORM_ROW)?;
        self.hw.display.set_cursor_mode(CursorMode::Blink)
    }

    fn enter_frequency_digit(&mut self) -> Result<()> {
        let pending = self.settings.frequency_hz();
        let digit = DigitPlace::initial_for(pending);
        self.mode = PanelMode::EditFrequencyDigit { pending, digit };
        debug!("panel: {}", self.mode);
        self.hw
            .display
            .set_cursor(digit.cursor_column(), FREQUENCY_ROW)?;
        self.hw.display.set_cursor_mode(CursorMode::Underline)
    }

    fn return_to_waveform<I: PanelInput>(&mut self, input: &mut I) -> Result<()> {
        input.restart_idle_timer();
        input.discard_rotation();
        self.heal_frequency()?;
        self.hw
            .display
            .show_frequency(self.settings.frequency_hz(), LeadingZeros::Suppress)?;
        self.mode = PanelMode::EditWaveform {
            pending: self.settings.waveform(),
        };
        debug!("panel: {}", self.mode);
        self.hw.display.set_cursor(WAVEFORM_COLUMN, WAVEFORM_ROW)?;
        self.hw.display.set_cursor_mode(CursorMode::Blink)
    }

    /// Abandon the pending edit, restore the committed fields and go idle
    fn idle_timeout(&mut self) -> Result<()> {
        info!("panel: idle timeout in {}", self.mode);
        let mode = self.mode;
        self.mode = PanelMode::Idle;

        match mode {
            PanelMode::Idle => {}
            PanelMode::EditWaveform { pending } => {
                let committed = self.settings.waveform();
                if pending != committed {
                    self.hw.display.show_waveform(committed)?;
                }
                if !committed.is_ttl() {
                    self.hw
                        .display
                        .show_level(self.settings.level(), self.settings.unit())?;
                }
            }
            PanelMode::EditLevel { pending } => {
                if pending != self.settings.level() {
                    self.hw
                        .display
                        .show_level(self.settings.level(), self.settings.unit())?;
                }
            }
            PanelMode::EditFrequencyDigit { pending, .. } => {
                let healed = self.heal_frequency()?;
                if healed || pending != self.settings.frequency_hz() {
                    self.hw
                        .display
                        .show_frequency(self.settings.frequency_hz(), LeadingZeros::Suppress)?;
                }
            }
            PanelMode::EditFrequencyValue { .. } => {
                self.heal_frequency()?;
                self.hw
                    .display
                    .show_frequency(self.settings.frequency_hz(), LeadingZeros::Suppress)?;
            }
        }

        self.hw.display.set_cursor_mode(CursorMode::Hidden)
    }

    /// Make `waveform` the output waveform
    ///
    /// Dependent fields are re-clamped first; only clamped fields are
    /// persisted besides the waveform itself.
    fn commit_waveform(&mut self, waveform: Waveform) -> Result<()> {
        let leaving_ttl = self.settings.waveform().is_ttl();
        let change = self.settings.set_waveform(waveform);
        if !change.changed {
            return self.hw.display.set_cursor(WAVEFORM_COLUMN, WAVEFORM_ROW);
        }
        info!("commit: waveform {}", waveform);

        self.hw.display.show_waveform(waveform)?;

        if change.frequency_clamped {
            let frequency_hz = self.settings.frequency_hz();
            info!("commit: frequency clamped to {} Hz", frequency_hz);
            self.hw.generator.set_frequency(frequency_hz)?;
            self.hw.store.save(SettingValue::Frequency(frequency_hz))?;
            self.hw
                .display
                .show_frequency(frequency_hz, LeadingZeros::Suppress)?;
        }

        if !waveform.is_ttl() {
            let (level, unit) = (self.settings.level(), self.settings.unit());
            // The DAC code depends on the shape, so it is rewritten even
            // when the level itself is unchanged.
            self.hw.generator.set_level(level, waveform, unit)?;
            if change.level_clamped {
                info!("commit: level clamped to {}", level);
                self.hw.store.save(SettingValue::Level(level))?;
            }
            self.hw.display.show_level(level, unit)?;
        }

        if leaving_ttl {
            // The DDS must be out of square mode before the attenuator is
            // switched back onto the output.
            self.hw.generator.set_waveform(waveform)?;
            self.hw.generator.set_relay(false)?;
        } else {
            self.hw.generator.set_relay(waveform.is_ttl())?;
            self.hw.generator.set_waveform(waveform)?;
        }
        self.hw.store.save(SettingValue::Waveform(waveform))?;

        if self.policy.needs_confirmation() {
            self.hw.beeper.beep(CONFIRM_BEEP_MS)?;
        }
        self.hw.display.set_cursor(WAVEFORM_COLUMN, WAVEFORM_ROW)
    }

    fn commit_level(&mut self, level: u16) -> Result<()> {
        if level == self.settings.level() || !self.settings.set_level(level) {
            return Ok(());
        }
        debug!("commit: level {} {}", level, self.settings.unit());
        self.hw
            .generator
            .set_level(level, self.settings.waveform(), self.settings.unit())?;
        self.hw.store.save(SettingValue::Level(level))
    }

    fn commit_frequency(&mut self, frequency_hz: u32) -> Result<()> {
        if frequency_hz == self.settings.frequency_hz() || !self.settings.set_frequency(frequency_hz)
        {
            return Ok(());
        }
        debug!("commit: frequency {} Hz", frequency_hz);
        self.hw.generator.set_frequency(frequency_hz)?;
        self.hw.store.save(SettingValue::Frequency(frequency_hz))
    }

    /// Switch between RMS and peak-to-peak, always committing and persisting
    fn toggle_unit(&mut self) -> Result<()> {
        let unit = self.settings.toggle_unit();
        let level = self.settings.level();
        info!("commit: unit {} level {}", unit, level);
        self.mode = PanelMode::EditLevel { pending: level };

        self.hw.display.show_level(level, unit)?;
        self.hw
            .display
            .set_cursor(self.step.cursor_column(), WAVEFORM_ROW)?;
        self.hw
            .generator
            .set_level(level, self.settings.waveform(), unit)?;
        self.hw.store.save(SettingValue::Level(level))?;
        self.hw.store.save(SettingValue::LevelUnit(unit))?;
        self.hw.beeper.beep(CONFIRM_BEEP_MS)
    }

    /// Replace a committed zero frequency with the default
    fn heal_frequency(&mut self) -> Result<bool> {
        if !self.settings.heal_frequency() {
            return Ok(false);
        }
        let frequency_hz = self.settings.frequency_hz();
        warn!("frequency was 0 Hz, restored {} Hz", frequency_hz);
        self.hw.generator.set_frequency(frequency_hz)?;
        self.hw.store.save(SettingValue::Frequency(frequency_hz))?;
        self.hw.beeper.beep(CONFIRM_BEEP_MS)?;
        Ok(true)
    }
}
