//! Settings in On-Chip Flash
//!
//! The last 2 KiB page of bank memory holds a log of 16-byte records, one
//! per save, appended to successive slots. Load takes the newest valid slot.
//! The page is erased only when every slot has been used, and a save that
//! changes nothing writes nothing.

use embassy_stm32::flash::{Blocking, Flash};

use crate::config::{SETTINGS_FLASH_OFFSET, SETTINGS_FLASH_PAGE};
use crate::error::{Error, Result};
use crate::settings::{
    SettingValue, SettingsStore, SlotScan, StoredSettings, RECORD_LEN, RECORD_SLOTS,
};

/// Settings store backed by one flash page
pub struct FlashStore<'d> {
    flash: Flash<'d, Blocking>,
}

impl<'d> FlashStore<'d> {
    /// Use the settings page of `flash`
    #[must_use]
    pub fn new(flash: Flash<'d, Blocking>) -> Self {
        Self { flash }
    }

    fn slot_offset(slot: usize) -> u32 {
        SETTINGS_FLASH_OFFSET + (slot * RECORD_LEN) as u32
    }

    fn scan(&mut self) -> Result<SlotScan> {
        let mut scan = SlotScan::new();
        for slot in 0..RECORD_SLOTS {
            let mut record = [0u8; RECORD_LEN];
            self.flash
                .blocking_read(Self::slot_offset(slot), &mut record)
                .map_err(|e| {
                    warn!("flash: read failed: {}", e);
                    Error::Storage
                })?;
            if !scan.push(slot, &record) {
                break;
            }
        }
        Ok(scan)
    }

    fn erase_page(&mut self) -> Result<()> {
        let page_end = SETTINGS_FLASH_OFFSET + SETTINGS_FLASH_PAGE;
        self.flash
            .blocking_erase(SETTINGS_FLASH_OFFSET, page_end)
            .map_err(|e| {
                warn!("flash: erase failed: {}", e);
                Error::Storage
            })
    }

    fn write_slot(&mut self, slot: usize, stored: &StoredSettings) -> Result<()> {
        self.flash
            .blocking_write(Self::slot_offset(slot), &stored.encode())
            .map_err(|e| {
                warn!("flash: write failed: {}", e);
                Error::Storage
            })
    }
}

impl SettingsStore for FlashStore<'_> {
    fn load(&mut self) -> Result<StoredSettings> {
        Ok(self.scan()?.latest)
    }

    fn save(&mut self, value: SettingValue) -> Result<()> {
        let scan = self.scan()?;
        let current = scan.latest;
        // An unreadable record is rebuilt from the defaults.
        let mut next = if current == StoredSettings::ERASED {
            StoredSettings::default()
        } else {
            current
        };
        next.apply(value);
        if next == current {
            return Ok(());
        }
        trace!("flash: saving {}", value);
        let slot = match scan.next_free {
            Some(slot) => slot,
            None => {
                debug!("flash: settings page full, erasing");
                self.erase_page()?;
                0
            }
        };
        self.write_slot(slot, &next)
    }
}
