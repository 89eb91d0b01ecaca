//! Settings storage in on-board flash
//!
//! The last 4 KiB erase sector of the 2 MB QSPI flash is kept out of the
//! firmware image by `memory.x` and exposed as a flat [`NvStorage`] region.
//! Writes are read-modify-erase-write of the whole sector, skipped when the
//! bytes already match.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use injector_hal::storage::{NvStorage, StorageError};

/// Flash size on the Pico and most RP2040 boards
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flash offset of the settings sector
pub const SETTINGS_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
    sector: [u8; ERASE_SIZE],
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self {
            flash: Flash::new_blocking(flash),
            sector: [0; ERASE_SIZE],
        }
    }
}

impl NvStorage for Rp2040FlashStorage<'_> {
    fn capacity(&self) -> usize {
        ERASE_SIZE
    }

    fn read(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, buffer.len())?;
        self.flash
            .blocking_read(SETTINGS_OFFSET + offset, buffer)
            .map_err(|_| StorageError::Flash)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, data.len())?;
        let start = offset as usize;
        let end = start + data.len();

        self.flash
            .blocking_read(SETTINGS_OFFSET, &mut self.sector)
            .map_err(|_| StorageError::Flash)?;
        if self.sector[start..end] == *data {
            return Ok(());
        }
        self.sector[start..end].copy_from_slice(data);

        self.flash
            .blocking_erase(SETTINGS_OFFSET, SETTINGS_OFFSET + ERASE_SIZE as u32)
            .map_err(|_| StorageError::Flash)?;
        self.flash
            .blocking_write(SETTINGS_OFFSET, &self.sector)
            .map_err(|_| StorageError::Flash)
    }
}
