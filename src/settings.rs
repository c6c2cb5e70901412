//! Instrument Settings
//!
//! The committed settings model, the raw persisted record it is restored
//! from, and the store capability the front panel writes through.
//!
//! The model owns the cross-field invariants: frequency never exceeds the
//! current waveform's maximum, and the level always lies inside the bounds of
//! the current unit and waveform. Every mutation that could break one of them
//! re-clamps and reports what it changed, so the caller knows which hardware
//! and storage writes are due.

use crate::config::{
    DEFAULT_FREQUENCY_HZ, DEFAULT_LEVEL, DEFAULT_LEVEL_UNIT, DEFAULT_WAVEFORM, MIN_FREQUENCY_HZ,
    SETTINGS_FLASH_PAGE,
};
use crate::error::{Error, Result};
use crate::level::{self, LevelBounds};
use crate::types::{LevelUnit, Waveform};

/// Committed, persisted instrument settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    waveform: Waveform,
    frequency_hz: u32,
    level: u16,
    unit: LevelUnit,
}

/// Side effects of a waveform change
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveformChange {
    /// The waveform actually changed
    pub changed: bool,
    /// The level had to be clamped into the new waveform's bounds
    pub level_clamped: bool,
    /// The frequency had to be lowered to the new waveform's maximum
    pub frequency_clamped: bool,
}

/// Fields replaced by defaults while restoring a stored record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Substitutions {
    /// Stored waveform code was not recognised
    pub waveform: bool,
    /// Stored frequency was zero or above the waveform's maximum
    pub frequency: bool,
    /// Stored level was outside the bounds of its unit and waveform
    pub level: bool,
    /// Stored unit code was not recognised
    pub unit: bool,
}

impl Substitutions {
    /// Check if any field fell back to its default
    #[must_use]
    pub const fn any(&self) -> bool {
        self.waveform || self.frequency || self.level || self.unit
    }
}

impl Settings {
    /// Factory defaults: sine, 1 kHz, 2.00 Vpp
    pub const DEFAULT: Self = Self {
        waveform: DEFAULT_WAVEFORM,
        frequency_hz: DEFAULT_FREQUENCY_HZ,
        level: DEFAULT_LEVEL,
        unit: DEFAULT_LEVEL_UNIT,
    };

    /// Build settings from explicit values, clamping them into range
    #[must_use]
    pub fn new(waveform: Waveform, frequency_hz: u32, level: u16, unit: LevelUnit) -> Self {
        Self {
            waveform,
            frequency_hz: frequency_hz.clamp(MIN_FREQUENCY_HZ, waveform.max_frequency_hz()),
            level: LevelBounds::for_unit(unit, waveform).clamp(level),
            unit,
        }
    }

    /// Restore settings from a raw record, substituting defaults for invalid fields
    ///
    /// Fields are checked in dependency order: the waveform first (the
    /// frequency limit depends on it), then the unit (the level bounds
    /// depend on both). An invalid level falls back to the default
    /// 2.00 Vpp, re-expressed in the restored unit.
    #[must_use]
    pub fn from_stored(stored: &StoredSettings) -> (Self, Substitutions) {
        let mut substituted = Substitutions::default();

        let waveform = Waveform::from_code(stored.waveform).unwrap_or_else(|| {
            substituted.waveform = true;
            DEFAULT_WAVEFORM
        });

        let frequency_hz = if (MIN_FREQUENCY_HZ..=waveform.max_frequency_hz()).contains(&stored.frequency_hz) {
            stored.frequency_hz
        } else {
            substituted.frequency = true;
            DEFAULT_FREQUENCY_HZ
        };

        let unit = LevelUnit::from_code(stored.unit).unwrap_or_else(|| {
            substituted.unit = true;
            DEFAULT_LEVEL_UNIT
        });

        let level = if LevelBounds::for_unit(unit, waveform).contains(stored.level) {
            stored.level
        } else {
            substituted.level = true;
            level::convert(DEFAULT_LEVEL, LevelUnit::PeakToPeak, unit, waveform)
        };

        (
            Self {
                waveform,
                frequency_hz,
                level,
                unit,
            },
            substituted,
        )
    }

    /// Get the waveform
    #[must_use]
    pub const fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Get the level in centivolts (in [`Self::unit`])
    #[must_use]
    pub const fn level(&self) -> u16 {
        self.level
    }

    /// Get the level unit
    #[must_use]
    pub const fn unit(&self) -> LevelUnit {
        self.unit
    }

    /// Legal level range for the current unit and waveform
    #[must_use]
    pub fn level_bounds(&self) -> LevelBounds {
        LevelBounds::for_unit(self.unit, self.waveform)
    }

    /// Highest frequency allowed for the current waveform
    #[must_use]
    pub const fn max_frequency_hz(&self) -> u32 {
        self.waveform.max_frequency_hz()
    }

    /// Switch waveform, re-clamping level and frequency
    ///
    /// The level is left alone while square (TTL) is selected and re-clamped
    /// when an analog shape is chosen again.
    pub fn set_waveform(&mut self, waveform: Waveform) -> WaveformChange {
        if waveform == self.waveform {
            return WaveformChange::default();
        }
        self.waveform = waveform;

        let mut level_clamped = false;
        if !waveform.is_ttl() {
            let clamped_level = self.level_bounds().clamp(self.level);
            level_clamped = clamped_level != self.level;
            self.level = clamped_level;
        }

        let frequency_clamped = self.frequency_hz > waveform.max_frequency_hz();
        if frequency_clamped {
            self.frequency_hz = waveform.max_frequency_hz();
        }

        WaveformChange {
            changed: true,
            level_clamped,
            frequency_clamped,
        }
    }

    /// Set the level; returns `false` (and keeps the old value) if out of bounds
    pub fn set_level(&mut self, level: u16) -> bool {
        if !self.level_bounds().contains(level) {
            return false;
        }
        self.level = level;
        true
    }

    /// Switch level unit, converting the level so the output stays put
    pub fn toggle_unit(&mut self) -> LevelUnit {
        let unit = self.unit.toggle();
        self.level = level::convert(self.level, self.unit, unit, self.waveform);
        self.unit = unit;
        unit
    }

    /// Set the frequency; returns `false` (and keeps the old value) if above the maximum
    ///
    /// Zero is accepted: it is reachable while editing digit by digit and is
    /// healed by [`Self::heal_frequency`] when editing ends.
    pub fn set_frequency(&mut self, frequency_hz: u32) -> bool {
        if frequency_hz > self.max_frequency_hz() {
            return false;
        }
        self.frequency_hz = frequency_hz;
        true
    }

    /// Replace a zero frequency with the default; returns whether it did
    pub fn heal_frequency(&mut self) -> bool {
        if self.frequency_hz != 0 {
            return false;
        }
        self.frequency_hz = DEFAULT_FREQUENCY_HZ;
        true
    }

    /// Raw record for these settings
    #[must_use]
    pub const fn to_stored(&self) -> StoredSettings {
        StoredSettings {
            waveform: self.waveform.code(),
            frequency_hz: self.frequency_hz,
            level: self.level,
            unit: self.unit.code(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Settings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Settings({}, {} Hz, {} c{})",
            self.waveform,
            self.frequency_hz,
            self.level,
            self.unit
        );
    }
}

/// One persisted field with its new value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingValue {
    /// Output waveform
    Waveform(Waveform),
    /// Frequency in Hz
    Frequency(u32),
    /// Level in centivolts
    Level(u16),
    /// Level unit
    LevelUnit(LevelUnit),
}

#[cfg(feature = "embedded")]
impl defmt::Format for SettingValue {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Waveform(w) => defmt::write!(f, "waveform={}", w),
            Self::Frequency(hz) => defmt::write!(f, "frequency={}", hz),
            Self::Level(l) => defmt::write!(f, "level={}", l),
            Self::LevelUnit(u) => defmt::write!(f, "unit={}", u),
        }
    }
}

/// Raw settings as read back from non-volatile memory
///
/// Values are not validated; an erased or corrupted record is represented
/// faithfully and rejected field by field in [`Settings::from_stored`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredSettings {
    /// Waveform code
    pub waveform: u8,
    /// Frequency in Hz
    pub frequency_hz: u32,
    /// Level in centivolts
    pub level: u16,
    /// Level unit code
    pub unit: u8,
}

/// Record layout: magic, version, fields (little endian), padding, checksum
const RECORD_MAGIC: [u8; 2] = *b"FG";
const RECORD_VERSION: u8 = 1;

/// Length of an encoded settings record (a multiple of the flash write unit)
pub const RECORD_LEN: usize = 16;

impl StoredSettings {
    /// What an erased flash page reads back as
    pub const ERASED: Self = Self {
        waveform: 0xFF,
        frequency_hz: u32::MAX,
        level: u16::MAX,
        unit: 0xFF,
    };

    /// Store a single field
    pub fn apply(&mut self, value: SettingValue) {
        match value {
            SettingValue::Waveform(waveform) => self.waveform = waveform.code(),
            SettingValue::Frequency(hz) => self.frequency_hz = hz,
            SettingValue::Level(level) => self.level = level,
            SettingValue::LevelUnit(unit) => self.unit = unit.code(),
        }
    }

    /// Encode into the fixed-size flash record
    #[must_use]
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[0..2].copy_from_slice(&RECORD_MAGIC);
        record[2] = RECORD_VERSION;
        record[3] = self.waveform;
        record[4..8].copy_from_slice(&self.frequency_hz.to_le_bytes());
        record[8..10].copy_from_slice(&self.level.to_le_bytes());
        record[10] = self.unit;
        record[RECORD_LEN - 1] = checksum(&record[..RECORD_LEN - 1]);
        record
    }

    /// Decode a flash record; anything unrecognisable reads as [`Self::ERASED`]
    #[must_use]
    pub fn decode(record: &[u8; RECORD_LEN]) -> Self {
        if record[0..2] != RECORD_MAGIC
            || record[2] != RECORD_VERSION
            || record[RECORD_LEN - 1] != checksum(&record[..RECORD_LEN - 1])
        {
            return Self::ERASED;
        }

        Self {
            waveform: record[3],
            frequency_hz: u32::from_le_bytes([record[4], record[5], record[6], record[7]]),
            level: u16::from_le_bytes([record[8], record[9]]),
            unit: record[10],
        }
    }
}

impl Default for StoredSettings {
    fn default() -> Self {
        Settings::DEFAULT.to_stored()
    }
}

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0xA5u8, |acc, &b| acc.rotate_left(1) ^ b)
}

/// Record slots in the settings page
pub const RECORD_SLOTS: usize = SETTINGS_FLASH_PAGE as usize / RECORD_LEN;

/// What a blank (erased) slot reads back as
const BLANK_SLOT: [u8; RECORD_LEN] = [0xFF; RECORD_LEN];

/// Result of walking a page of record slots
///
/// Records are appended to consecutive slots, so the log ends at the first
/// blank slot and the newest record is the last valid one before it. A torn
/// or corrupt slot is stepped over. A page with no blank slot is full and
/// must be erased before the next append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotScan {
    /// Newest valid record, or [`StoredSettings::ERASED`] if there is none
    pub latest: StoredSettings,
    /// First blank slot, `None` when the page is full
    pub next_free: Option<usize>,
}

impl SlotScan {
    /// Scan state before the first slot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: StoredSettings::ERASED,
            next_free: None,
        }
    }

    /// Feed the contents of `slot`; returns `false` once the log has ended
    pub fn push(&mut self, slot: usize, record: &[u8; RECORD_LEN]) -> bool {
        if *record == BLANK_SLOT {
            self.next_free = Some(slot);
            return false;
        }
        let decoded = StoredSettings::decode(record);
        if decoded != StoredSettings::ERASED {
            self.latest = decoded;
        }
        true
    }

    /// Scan slots in order, starting at slot 0
    pub fn from_slots<I>(slots: I) -> Self
    where
        I: IntoIterator<Item = [u8; RECORD_LEN]>,
    {
        let mut scan = Self::new();
        for (slot, record) in slots.into_iter().enumerate().take(RECORD_SLOTS) {
            if !scan.push(slot, &record) {
                break;
            }
        }
        scan
    }
}

impl Default for SlotScan {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-volatile key/value persistence for the settings
///
/// Each save must be durable before the next load.
pub trait SettingsStore {
    /// Read the raw record
    fn load(&mut self) -> Result<StoredSettings>;

    /// Persist one field
    fn save(&mut self, value: SettingValue) -> Result<()>;
}

/// Volatile settings store
///
/// Used for host tests. Counts writes so callers can verify persistence
/// traffic.
#[derive(Clone, Debug, Default)]
pub struct RamStore {
    record: StoredSettings,
    writes: u32,
    fail: bool,
}

impl RamStore {
    /// Create a store holding `record`
    #[must_use]
    pub const fn new(record: StoredSettings) -> Self {
        Self {
            record,
            writes: 0,
            fail: false,
        }
    }

    /// Create a store whose every operation fails
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            record: StoredSettings::ERASED,
            writes: 0,
            fail: true,
        }
    }

    /// Current record
    #[must_use]
    pub const fn record(&self) -> &StoredSettings {
        &self.record
    }

    /// Number of successful saves
    #[must_use]
    pub const fn writes(&self) -> u32 {
        self.writes
    }
}

impl SettingsStore for RamStore {
    fn load(&mut self) -> Result<StoredSettings> {
        if self.fail {
            return Err(Error::Storage);
        }
        Ok(self.record)
    }

    fn save(&mut self, value: SettingValue) -> Result<()> {
        if self.fail {
            return Err(Error::Storage);
        }
        self.record.apply(value);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_survives_encoding() {
        let stored = Settings::new(Waveform::Triangle, 12_345, 150, LevelUnit::Rms).to_stored();
        assert_eq!(StoredSettings::decode(&stored.encode()), stored);
    }

    #[test]
    fn corrupted_record_reads_as_erased() {
        let mut bytes = StoredSettings::default().encode();
        bytes[5] ^= 0x10;
        assert_eq!(StoredSettings::decode(&bytes), StoredSettings::ERASED);
    }

    #[test]
    fn erased_flash_restores_defaults() {
        let (settings, substituted) = Settings::from_stored(&StoredSettings::decode(&[0xFF; RECORD_LEN]));
        assert_eq!(settings, Settings::DEFAULT);
        assert!(substituted.waveform && substituted.frequency && substituted.level && substituted.unit);
    }
}
