//! Driver Tests
//!
//! Bus-level tests for the signal chain, buzzer and LCD drivers against
//! recording `embedded-hal` fakes.
//! Run with: cargo test --test driver_tests

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c, Operation};
use embedded_hal::spi::{self, SpiBus};

use dds_funcgen::drivers::ad9833;
use dds_funcgen::drivers::buzzer::Buzzer;
use dds_funcgen::drivers::generator::SignalChain;
use dds_funcgen::drivers::lcd::{frequency_text, level_text, waveform_text, Lcd};
use dds_funcgen::error::Error;
use dds_funcgen::panel::{Beeper, Generator, PanelDisplay};
use dds_funcgen::types::{CursorMode, LeadingZeros, LevelUnit, Waveform};

// =============================================================================
// Recording fakes
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Pin(&'static str, bool),
    Spi(Vec<u8>),
    DelayNs(u64),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct FakePin {
    name: &'static str,
    log: Log,
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.name, true));
        Ok(())
    }
}

struct FakeDelay {
    log: Log,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(u64::from(ns)));
    }
}

#[derive(Debug)]
struct BusFault;

impl spi::Error for BusFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

struct FakeSpi {
    log: Log,
    fail: bool,
}

impl spi::ErrorType for FakeSpi {
    type Error = BusFault;
}

impl SpiBus for FakeSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(BusFault);
        }
        self.log.borrow_mut().push(Event::Spi(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let copy = words.to_vec();
        self.write(&copy)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeI2c {
    writes: Vec<(u8, Vec<u8>)>,
}

impl i2c::ErrorType for FakeI2c {
    type Error = Infallible;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations {
            if let Operation::Write(bytes) = operation {
                self.writes.push((address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}

type Chain = SignalChain<FakeSpi, FakePin, FakePin, FakePin, FakeDelay>;

fn signal_chain(fail: bool) -> (Chain, Log) {
    let log = Log::default();
    let pin = |name| FakePin {
        name,
        log: Rc::clone(&log),
    };
    let chain = SignalChain::new(
        FakeSpi {
            log: Rc::clone(&log),
            fail,
        },
        pin("dds_cs"),
        pin("dac_cs"),
        pin("relay"),
        FakeDelay {
            log: Rc::clone(&log),
        },
    );
    (chain, log)
}

/// SPI payloads framed by a low-high pulse on `cs`
fn frames(log: &Log, cs: &str) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    let mut selected = false;
    for event in log.borrow().iter() {
        match event {
            Event::Pin(name, level) if *name == cs => selected = !level,
            Event::Spi(bytes) if selected => frames.push(bytes.clone()),
            _ => {}
        }
    }
    frames
}

fn total_delay_ms(log: &Log) -> u64 {
    let ns: u64 = log
        .borrow()
        .iter()
        .map(|event| match event {
            Event::DelayNs(ns) => *ns,
            _ => 0,
        })
        .sum();
    ns / 1_000_000
}

// =============================================================================
// Signal Chain Tests
// =============================================================================

#[test]
fn test_init_parks_dds() {
    let (mut chain, log) = signal_chain(false);
    chain.init().unwrap();

    assert_eq!(
        log.borrow()[..3],
        [
            Event::Pin("dds_cs", true),
            Event::Pin("dac_cs", true),
            Event::Pin("relay", false),
        ]
    );
    assert_eq!(
        frames(&log, "dds_cs"),
        [
            ad9833::RESET_WORD.to_be_bytes().to_vec(),
            ad9833::OFF_WORD.to_be_bytes().to_vec(),
        ]
    );
    assert!(frames(&log, "dac_cs").is_empty());
    assert!(total_delay_ms(&log) >= 1);
}

#[test]
fn test_frequency_written_low_half_first() {
    let (mut chain, log) = signal_chain(false);
    chain.set_frequency(1_000).unwrap();
    // 1000 Hz -> tuning word 10737 = 0x29F1
    assert_eq!(frames(&log, "dds_cs"), [vec![0x69, 0xF1], vec![0x40, 0x00]]);
}

#[test]
fn test_frequency_word_upper_half() {
    // 5 MHz -> 0x3333333: low 14 bits 0x3333, high 14 bits 0x0CCC
    assert_eq!(ad9833::frequency_word(5_000_000), 0x333_3333);
    assert_eq!(ad9833::frequency_writes(5_000_000), [0x7333, 0x4CCC]);
}

#[test]
fn test_waveform_control_words() {
    let (mut chain, log) = signal_chain(false);
    chain.set_waveform(Waveform::Sine).unwrap();
    chain.set_waveform(Waveform::Square).unwrap();
    chain.set_waveform(Waveform::Triangle).unwrap();
    assert_eq!(
        frames(&log, "dds_cs"),
        [vec![0x20, 0x00], vec![0x20, 0x28], vec![0x20, 0x02]]
    );
}

#[test]
fn test_level_goes_to_dac_only() {
    let (mut chain, log) = signal_chain(false);
    chain.set_level(200, Waveform::Sine, LevelUnit::PeakToPeak).unwrap();
    // 2.00 Vpp -> ladder 1365 -> 0x1554 after the shift
    assert_eq!(frames(&log, "dac_cs"), [vec![0x15, 0x54]]);
    assert!(frames(&log, "dds_cs").is_empty());
}

#[test]
fn test_rms_level_capped_at_full_scale() {
    let (mut chain, log) = signal_chain(false);
    chain.set_level(212, Waveform::Sine, LevelUnit::Rms).unwrap();
    assert_eq!(frames(&log, "dac_cs"), [vec![0x3F, 0xFC]]);
}

#[test]
fn test_relay_on_waits_to_settle() {
    let (mut chain, log) = signal_chain(false);
    chain.set_relay(true).unwrap();
    assert_eq!(log.borrow()[0], Event::Pin("relay", true));
    assert!(total_delay_ms(&log) >= 10);

    let (mut chain, log) = signal_chain(false);
    chain.set_relay(false).unwrap();
    assert_eq!(*log.borrow(), [Event::Pin("relay", false)]);
}

#[test]
fn test_spi_failure_releases_chip_select() {
    let (mut chain, log) = signal_chain(true);
    let result = chain.set_waveform(Waveform::Sine);
    assert_eq!(result, Err(Error::Spi(spi::ErrorKind::Other)));
    assert_eq!(log.borrow().last(), Some(&Event::Pin("dds_cs", true)));
}

// =============================================================================
// Buzzer Tests
// =============================================================================

#[test]
fn test_beep_duration() {
    let log = Log::default();
    let pin = FakePin {
        name: "buzzer",
        log: Rc::clone(&log),
    };
    let mut buzzer = Buzzer::new(pin, FakeDelay { log: Rc::clone(&log) }).unwrap();
    buzzer.beep(80).unwrap();

    let events = log.borrow();
    assert_eq!(events[0], Event::Pin("buzzer", false));
    assert_eq!(events[1], Event::Pin("buzzer", true));
    assert_eq!(events.last(), Some(&Event::Pin("buzzer", false)));
    drop(events);
    assert_eq!(total_delay_ms(&log), 80);
}

// =============================================================================
// LCD Rendering Tests
// =============================================================================

#[test]
fn test_frequency_field_suppresses_leading_zeros() {
    assert_eq!(frequency_text(5_000_000, LeadingZeros::Suppress), "5.000.000kHz");
    assert_eq!(frequency_text(500_000, LeadingZeros::Suppress), "  500.000kHz");
    assert_eq!(frequency_text(45_000, LeadingZeros::Suppress), "   45.000kHz");
    assert_eq!(frequency_text(1, LeadingZeros::Suppress), "    0.001kHz");
    assert_eq!(frequency_text(0, LeadingZeros::Suppress), "    0.000kHz");
}

#[test]
fn test_frequency_field_shows_edited_high_digits() {
    assert_eq!(frequency_text(5_000, LeadingZeros::TenKilo), "   05.000kHz");
    assert_eq!(frequency_text(5_000, LeadingZeros::HundredKilo), "  005.000kHz");
    assert_eq!(frequency_text(45_000, LeadingZeros::HundredKilo), "  045.000kHz");
}

#[test]
fn test_frequency_field_clamps() {
    assert_eq!(frequency_text(12_000_000, LeadingZeros::Suppress), "9.999.999kHz");
}

#[test]
fn test_frequency_field_fixed_width() {
    for hz in [0, 7, 99_999, 1_000_000, 5_000_000] {
        for zeros in [LeadingZeros::Suppress, LeadingZeros::TenKilo, LeadingZeros::HundredKilo] {
            assert_eq!(frequency_text(hz, zeros).len(), 12);
        }
    }
}

#[test]
fn test_level_and_waveform_fields() {
    assert_eq!(level_text(600), "6.00");
    assert_eq!(level_text(173), "1.73");
    assert_eq!(waveform_text(Waveform::Sine).len(), 8);
    assert_eq!(waveform_text(Waveform::Triangle).len(), 8);
    assert_eq!(waveform_text(Waveform::Square), "SQUARE    5V-TTL");
}

// =============================================================================
// LCD Bus Tests
// =============================================================================

fn lcd() -> Lcd<FakeI2c, FakeDelay> {
    Lcd::new(FakeI2c::default(), FakeDelay { log: Log::default() })
}

/// Nibble writes (with EN pulse) carrying one byte
fn byte_writes(byte: u8, rs: bool) -> Vec<(u8, Vec<u8>)> {
    let mode = u8::from(rs) | 0x08;
    [byte & 0xF0, byte << 4]
        .into_iter()
        .map(|nibble| (0x27, vec![nibble | mode | 0x04, nibble | mode]))
        .collect()
}

#[test]
fn test_lcd_init_starts_with_8bit_resync() {
    let mut lcd = lcd();
    lcd.init().unwrap();
    let (i2c, _) = lcd.release();
    let first: Vec<_> = i2c.writes.iter().take(4).map(|(_, bytes)| bytes.clone()).collect();
    assert_eq!(
        first,
        [
            vec![0x3C, 0x38],
            vec![0x3C, 0x38],
            vec![0x3C, 0x38],
            vec![0x2C, 0x28],
        ]
    );
}

#[test]
fn test_lcd_cursor_addressing() {
    let mut lcd = lcd();
    lcd.set_cursor(11, 1).unwrap();
    let (i2c, _) = lcd.release();
    assert_eq!(i2c.writes, byte_writes(0x80 | 0x4B, false));
}

#[test]
fn test_lcd_cursor_modes() {
    for (mode, command) in [
        (CursorMode::Hidden, 0x0C),
        (CursorMode::Underline, 0x0E),
        (CursorMode::Blink, 0x0D),
    ] {
        let mut lcd = lcd();
        lcd.set_cursor_mode(mode).unwrap();
        let (i2c, _) = lcd.release();
        assert_eq!(i2c.writes, byte_writes(command, false));
    }
}

#[test]
fn test_lcd_level_field() {
    let mut lcd = lcd();
    lcd.show_level(200, LevelUnit::Rms).unwrap();
    let (i2c, _) = lcd.release();

    let mut expected = byte_writes(0x80 | 9, false);
    for c in "2.00".bytes() {
        expected.extend(byte_writes(c, true));
    }
    expected.extend(byte_writes(0x80 | 13, false));
    for c in "Vrm".bytes() {
        expected.extend(byte_writes(c, true));
    }
    assert_eq!(i2c.writes, expected);
}
