//! Signal Chain
//!
//! The DDS and the level DAC share one SPI bus (mode 2, MSB first) with
//! separate chip selects. The relay switches the output connector between
//! the attenuated analog path and the fixed 5 V TTL buffer.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{ad5452, ad9833};
use crate::config::RELAY_SETTLE_MS;
use crate::error::{Error, Result};
use crate::panel::Generator;
use crate::types::{LevelUnit, Waveform};

/// DDS, level DAC and output relay on one SPI bus
pub struct SignalChain<SPI, DdsCs, DacCs, Relay, D> {
    spi: SPI,
    dds_cs: DdsCs,
    dac_cs: DacCs,
    relay: Relay,
    delay: D,
}

impl<SPI, DdsCs, DacCs, Relay, D> SignalChain<SPI, DdsCs, DacCs, Relay, D>
where
    SPI: SpiBus,
    DdsCs: OutputPin,
    DacCs: OutputPin,
    Relay: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the bus and pins
    ///
    /// Nothing is written until [`Self::init`].
    pub fn new(spi: SPI, dds_cs: DdsCs, dac_cs: DacCs, relay: Relay, delay: D) -> Self {
        Self {
            spi,
            dds_cs,
            dac_cs,
            relay,
            delay,
        }
    }

    /// Deselect both chips, open the relay and park the DDS with its output off
    pub fn init(&mut self) -> Result<()> {
        self.dds_cs.set_high().map_err(|_| Error::Pin)?;
        self.dac_cs.set_high().map_err(|_| Error::Pin)?;
        self.relay.set_low().map_err(|_| Error::Pin)?;

        self.write_dds(ad9833::RESET_WORD)?;
        self.delay.delay_ms(1);
        self.write_dds(ad9833::OFF_WORD)?;
        debug!("signal chain: DDS parked");
        Ok(())
    }

    fn write_dds(&mut self, word: u16) -> Result<()> {
        write_word(&mut self.spi, &mut self.dds_cs, word)
    }

    fn write_dac(&mut self, word: u16) -> Result<()> {
        write_word(&mut self.spi, &mut self.dac_cs, word)
    }
}

/// Clock one 16-bit word out with `cs` held low, releasing `cs` even on failure
fn write_word<SPI: SpiBus, CS: OutputPin>(spi: &mut SPI, cs: &mut CS, word: u16) -> Result<()> {
    cs.set_low().map_err(|_| Error::Pin)?;
    let transfer = spi.write(&word.to_be_bytes()).and_then(|()| spi.flush());
    cs.set_high().map_err(|_| Error::Pin)?;
    transfer.map_err(Error::spi)
}

impl<SPI, DdsCs, DacCs, Relay, D> Generator for SignalChain<SPI, DdsCs, DacCs, Relay, D>
where
    SPI: SpiBus,
    DdsCs: OutputPin,
    DacCs: OutputPin,
    Relay: OutputPin,
    D: DelayNs,
{
    fn set_waveform(&mut self, waveform: Waveform) -> Result<()> {
        trace!("dds: waveform {}", waveform);
        self.write_dds(ad9833::control_word(waveform))
    }

    fn set_frequency(&mut self, frequency_hz: u32) -> Result<()> {
        trace!("dds: {} Hz", frequency_hz);
        for word in ad9833::frequency_writes(frequency_hz) {
            self.write_dds(word)?;
        }
        Ok(())
    }

    fn set_level(&mut self, level: u16, waveform: Waveform, unit: LevelUnit) -> Result<()> {
        let word = ad5452::level_word(level, waveform, unit);
        trace!("dac: level {} {} -> {=u16:#06x}", level, unit, word);
        self.write_dac(word)
    }

    fn set_relay(&mut self, ttl: bool) -> Result<()> {
        if ttl {
            self.relay.set_high().map_err(|_| Error::Pin)?;
            self.delay.delay_ms(RELAY_SETTLE_MS);
        } else {
            self.relay.set_low().map_err(|_| Error::Pin)?;
        }
        Ok(())
    }
}
