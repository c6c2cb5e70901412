//! Character LCD Driver
//!
//! HD44780-compatible 16x2 module behind a PCF8574 I2C port expander, run in
//! 4-bit mode. The expander's low nibble carries RS, RW, EN and the
//! backlight; the high nibble carries the data lines.
//!
//! Screen layout:
//!
//! ```text
//!     0123456789012345
//! r0      1.000.000kHz
//! r1  SINE     2.00Vpp
//! ```
//!
//! The field renderers are pure functions so the layout can be checked on
//! the host without a bus.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::String;

use crate::config::{LCD_COLUMNS, LCD_I2C_ADDR, LCD_ROWS};
use crate::error::{Error, Result};
use crate::panel::PanelDisplay;
use crate::types::{CursorMode, LeadingZeros, LevelUnit, Waveform};

/// HD44780 instructions
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const ENTRY_LEFT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// PCF8574 control lines
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Rendered frequency field: `D.DDD.DDDkHz`
pub type FrequencyText = String<12>;

/// Rendered level digits: `D.DD`
pub type LevelText = String<4>;

/// Position of the frequency field
pub const FREQUENCY_FIELD: (u8, u8) = (4, 0);

/// Position of the waveform field
pub const WAVEFORM_FIELD: (u8, u8) = (0, 1);

/// Position of the level digits
pub const LEVEL_FIELD: (u8, u8) = (9, 1);

/// Position of the level unit suffix
pub const LEVEL_UNIT_FIELD: (u8, u8) = (13, 1);

/// Largest value the frequency field can show
const FREQUENCY_FIELD_MAX: u32 = 9_999_999;

/// Render the frequency field
///
/// Seven decimal digits with a point after the MHz and kHz digits. The MHz
/// digit and its point are blanked when zero; the two digits below it are
/// blanked when they and everything above them are zero, unless `zeros`
/// asks for them while a high digit place is being edited.
#[must_use]
pub fn frequency_text(frequency_hz: u32, zeros: LeadingZeros) -> FrequencyText {
    let mut digits = [0u8; 7];
    let mut rest = frequency_hz.min(FREQUENCY_FIELD_MAX);
    for digit in digits.iter_mut().rev() {
        *digit = (rest % 10) as u8;
        rest /= 10;
    }

    let mut text = FrequencyText::new();
    let mut put = |c: char| {
        let _ = text.push(c);
    };

    for (i, &digit) in digits.iter().enumerate() {
        let glyph = char::from(b'0' + digit);
        match i {
            0 if digit == 0 => {
                put(' ');
                put(' ');
            }
            0 | 3 => {
                put(glyph);
                put('.');
            }
            1 if digits[..2] == [0, 0] && zeros != LeadingZeros::HundredKilo => put(' '),
            2 if digits[..3] == [0, 0, 0] && zeros == LeadingZeros::Suppress => put(' '),
            _ => put(glyph),
        }
    }
    for c in "kHz".chars() {
        put(c);
    }
    text
}

/// Render a level in centivolts as `D.DD`
#[must_use]
pub fn level_text(level: u16) -> LevelText {
    let mut text = LevelText::new();
    let digit = |value: u16| char::from(b'0' + (value % 10) as u8);
    for c in [digit(level / 100), '.', digit(level / 10), digit(level)] {
        let _ = text.push(c);
    }
    text
}

/// Waveform field text
///
/// Sine and triangle leave the level columns alone; square overwrites them
/// with the fixed TTL label.
#[must_use]
pub const fn waveform_text(waveform: Waveform) -> &'static str {
    match waveform {
        Waveform::Sine => "SINE    ",
        Waveform::Square => "SQUARE    5V-TTL",
        Waveform::Triangle => "TRIANGLE",
    }
}

/// HD44780 display on an I2C backpack
pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: u8,
}

impl<I2C: I2c, D: DelayNs> Lcd<I2C, D> {
    /// Create a driver for the backpack at the default address
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, LCD_I2C_ADDR)
    }

    /// Create a driver for a backpack strapped to another address
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: pin::BACKLIGHT,
        }
    }

    /// Run the 4-bit power-on sequence, clear the screen and hide the cursor
    pub fn init(&mut self) -> Result<()> {
        self.delay.delay_ms(50);

        // Three 8-bit function sets resynchronise the controller whatever
        // nibble phase it was left in, then switch to 4-bit.
        self.write_nibble(0x30, 0)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(0x20, 0)?;

        self.command(cmd::FUNCTION_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_LEFT)?;
        debug!("lcd: ready at {=u8:#04x}", self.address);
        Ok(())
    }

    /// Blank the screen and home the cursor
    pub fn clear(&mut self) -> Result<()> {
        self.command(cmd::CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<()> {
        self.backlight = if on { pin::BACKLIGHT } else { 0 };
        self.expander_write(0)
    }

    /// Move the cursor; out-of-range positions are pinned to the last column/row
    pub fn move_to(&mut self, column: u8, row: u8) -> Result<()> {
        let row = usize::from(row.min(LCD_ROWS - 1));
        let column = column.min(LCD_COLUMNS - 1);
        self.command(cmd::SET_DDRAM | (column + ROW_OFFSETS[row]))
    }

    /// Write text at the cursor (ASCII only)
    pub fn print(&mut self, text: &str) -> Result<()> {
        for byte in text.bytes() {
            self.send(byte, pin::RS)?;
        }
        Ok(())
    }

    /// Show two full lines, replacing the screen contents
    pub fn show_banner(&mut self, top: &str, bottom: &str) -> Result<()> {
        self.clear()?;
        self.print(top)?;
        self.move_to(0, 1)?;
        self.print(bottom)
    }

    /// Release the bus
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, instruction: u8) -> Result<()> {
        self.send(instruction, 0)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<()> {
        self.write_nibble(byte & 0xF0, mode)?;
        self.write_nibble(byte << 4, mode)?;
        self.delay.delay_us(50);
        Ok(())
    }

    /// Latch one nibble (in the high four bits) with an EN pulse
    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<()> {
        let data = nibble | mode | self.backlight;
        self.i2c
            .write(self.address, &[data | pin::EN, data])
            .map_err(Error::i2c)
    }

    fn expander_write(&mut self, data: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[data | self.backlight])
            .map_err(Error::i2c)
    }
}

impl<I2C: I2c, D: DelayNs> PanelDisplay for Lcd<I2C, D> {
    fn show_frequency(&mut self, frequency_hz: u32, zeros: LeadingZeros) -> Result<()> {
        let (column, row) = FREQUENCY_FIELD;
        self.move_to(column, row)?;
        self.print(&frequency_text(frequency_hz, zeros))
    }

    fn show_waveform(&mut self, waveform: Waveform) -> Result<()> {
        let (column, row) = WAVEFORM_FIELD;
        self.move_to(column, row)?;
        self.print(waveform_text(waveform))
    }

    fn show_level(&mut self, level: u16, unit: LevelUnit) -> Result<()> {
        let (column, row) = LEVEL_FIELD;
        self.move_to(column, row)?;
        self.print(&level_text(level))?;
        let (column, row) = LEVEL_UNIT_FIELD;
        self.move_to(column, row)?;
        self.print(unit.suffix())
    }

    fn set_cursor(&mut self, column: u8, row: u8) -> Result<()> {
        self.move_to(column, row)
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) -> Result<()> {
        let flags = match mode {
            CursorMode::Hidden => 0,
            CursorMode::Underline => cmd::CURSOR_ON,
            CursorMode::Blink => cmd::BLINK_ON,
        };
        self.command(cmd::DISPLAY_ON | flags)
    }
}
