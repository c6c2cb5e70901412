//! Piezo buzzer on a push-pull GPIO.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};
use crate::panel::Beeper;

/// Active buzzer driven high for the duration of a beep
pub struct Buzzer<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Buzzer<P, D> {
    /// Wrap the buzzer pin, silencing it
    pub fn new(mut pin: P, delay: D) -> Result<Self> {
        pin.set_low().map_err(|_| Error::Pin)?;
        Ok(Self { pin, delay })
    }
}

impl<P: OutputPin, D: DelayNs> Beeper for Buzzer<P, D> {
    fn beep(&mut self, duration_ms: u16) -> Result<()> {
        self.pin.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(u32::from(duration_ms));
        self.pin.set_low().map_err(|_| Error::Pin)
    }
}
