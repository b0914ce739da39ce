//! Serial EEPROM.

use parking_lot::RwLock;
use std::sync::Arc;

/// Capacity of the 24C64 EEPROM fitted to the instrument.
pub const EEPROM_SIZE: usize = 8192;

/// Value read back from erased cells.
const ERASED: u8 = 0xFF;

/// Byte-addressed nonvolatile memory.
///
/// Writes block until the cell has settled. Neither operation can fail.
#[cfg_attr(test, mockall::automock)]
pub trait NonvolatileStore {
    /// Read one byte.
    fn read_byte(&mut self, addr: u16) -> u8;

    /// Write one byte.
    fn write_byte(&mut self, addr: u16, value: u8);
}

impl<T: NonvolatileStore + ?Sized> NonvolatileStore for Box<T> {
    fn read_byte(&mut self, addr: u16) -> u8 {
        (**self).read_byte(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        (**self).write_byte(addr, value)
    }
}

/// RAM-backed EEPROM image shared between clones.
#[derive(Debug, Clone)]
pub struct MemoryEeprom {
    cells: Arc<RwLock<Vec<u8>>>,
}

impl MemoryEeprom {
    /// Create an erased image.
    pub fn new() -> Self {
        Self::with_contents(vec![ERASED; EEPROM_SIZE])
    }

    /// Create an image from existing contents, padded with erased cells.
    pub fn with_contents(mut contents: Vec<u8>) -> Self {
        contents.resize(EEPROM_SIZE, ERASED);
        Self {
            cells: Arc::new(RwLock::new(contents)),
        }
    }

    /// Copy of the full image.
    pub fn snapshot(&self) -> Vec<u8> {
        self.cells.read().clone()
    }

    /// Read a byte without going through the trait.
    pub fn peek(&self, addr: u16) -> u8 {
        self.cells.read().get(addr as usize).copied().unwrap_or(ERASED)
    }

    /// Write a byte without going through the trait.
    pub fn poke(&self, addr: u16, value: u8) {
        if let Some(cell) = self.cells.write().get_mut(addr as usize) {
            *cell = value;
        }
    }
}

impl Default for MemoryEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl NonvolatileStore for MemoryEeprom {
    fn read_byte(&mut self, addr: u16) -> u8 {
        self.peek(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.poke(addr, value)
    }
}
