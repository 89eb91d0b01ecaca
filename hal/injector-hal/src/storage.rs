//! Non-volatile storage abstraction
//!
//! The tester persists a small fixed-layout image at a fixed offset, so the
//! storage contract is a flat byte region rather than a key-value store.
//! Erased cells read back as `0xFF`, as on EEPROM and NOR flash.

/// Value of an erased storage byte
pub const ERASED_BYTE: u8 = 0xFF;

/// Errors from non-volatile storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access extends past the end of the region
    OutOfBounds,
    /// Underlying flash/EEPROM operation failed
    Flash,
}

/// Flat, byte-addressable non-volatile region
///
/// Offsets are relative to the start of the region. Implementations on
/// sector-erased flash must preserve bytes outside the written range.
pub trait NvStorage {
    /// Size of the region in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError>;

    /// Check that `len` bytes at `offset` fit inside the region
    fn check_bounds(&self, offset: u32, len: usize) -> Result<(), StorageError> {
        let end = (offset as usize)
            .checked_add(len)
            .ok_or(StorageError::OutOfBounds)?;
        if end > self.capacity() {
            return Err(StorageError::OutOfBounds);
        }
        Ok(())
    }
}

/// RAM-backed region
///
/// Starts fully erased. Used for host-side simulation and tests.
#[derive(Debug, Clone)]
pub struct RamStorage<const N: usize> {
    bytes: [u8; N],
    writes: u32,
}

impl<const N: usize> Default for RamStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamStorage<N> {
    /// Create an erased region
    pub const fn new() -> Self {
        Self {
            bytes: [ERASED_BYTE; N],
            writes: 0,
        }
    }

    /// Raw contents of the region
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Mutable raw contents (for seeding corrupt images in tests)
    pub fn bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    /// Number of completed write operations
    pub fn write_count(&self) -> u32 {
        self.writes
    }
}

impl<const N: usize> NvStorage for RamStorage<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, buffer.len())?;
        let start = offset as usize;
        buffer.copy_from_slice(&self.bytes[start..start + buffer.len()]);
        Ok(())
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, data.len())?;
        let start = offset as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}
