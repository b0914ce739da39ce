//! EEPROM-backed test record store and configuration block.
//!
//! Records fill the bottom of the EEPROM, 16 bytes each, in the order they
//! were taken. The configuration block and the record count sit in single
//! bytes near the top of the device, clear of the record array.
//!
//! Clearing the store only resets the count. Record bytes stay in place
//! but are no longer reachable.

use tracing::{debug, info, warn};

use crate::data::{Calibration, Settings, TestRecord, Units};
use crate::error::{Error, Result};
use crate::hal::NonvolatileStore;

/// Maximum number of stored tests.
pub const MAX_RECORDS: u8 = 99;

/// Address of the first record.
pub const RECORD_BASE: u16 = 0;

/// Addresses of the configuration block.
pub mod address {
    /// Power level menu code.
    pub const POWER: u16 = 8143;
    /// Density menu code.
    pub const DENSITY: u16 = 8144;
    /// Weight class menu code.
    pub const WEIGHT: u16 = 8145;
    /// Mohs hardness menu code.
    pub const MOHS: u16 = 8146;
    /// Units menu code.
    pub const UNITS: u16 = 8147;
    /// Aggregate size menu code.
    pub const AGGREGATE: u16 = 8148;
    /// Calibration zero reading.
    pub const ZERO: u16 = 8149;
    /// Calibration full-scale reading.
    pub const FULL_SCALE: u16 = 8150;
    /// Number of stored records.
    pub const COUNT: u16 = 8151;

    /// Settings fields in persisted order.
    pub(crate) const SETTINGS: [u16; 6] = [POWER, DENSITY, WEIGHT, MOHS, UNITS, AGGREGATE];
}

fn record_address(slot: u8) -> u16 {
    RECORD_BASE + slot as u16 * TestRecord::SIZE as u16
}

/// Test records and configuration persisted in a [`NonvolatileStore`].
pub struct RecordStore<S> {
    store: S,
    count: u8,
}

impl<S: NonvolatileStore> RecordStore<S> {
    /// Open the store, normalizing a corrupt or blank record count to zero.
    pub fn new(mut store: S) -> Self {
        let mut count = store.read_byte(address::COUNT);
        if count > MAX_RECORDS {
            warn!("Stored test count {} invalid, resetting to 0", count);
            count = 0;
            store.write_byte(address::COUNT, count);
        }
        debug!("Record store opened with {} tests", count);
        Self { store, count }
    }

    /// Number of stored records.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Check if no more records can be stored.
    pub fn is_full(&self) -> bool {
        self.count >= MAX_RECORDS
    }

    /// Append a record in the next free slot.
    ///
    /// Returns the 1-based index of the new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when [`MAX_RECORDS`] are stored.
    pub fn append(&mut self, record: &TestRecord) -> Result<u8> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: MAX_RECORDS,
            });
        }

        let base = record_address(self.count);
        for (offset, byte) in record.to_bytes().into_iter().enumerate() {
            self.store.write_byte(base + offset as u16, byte);
        }
        self.count += 1;
        self.store.write_byte(address::COUNT, self.count);

        info!("Stored test {} (samples {:?})", self.count, record.samples);
        Ok(self.count)
    }

    /// Read the record at a 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `1 <= index <= count`.
    pub fn read(&mut self, index: u8) -> Result<TestRecord> {
        if index == 0 || index > self.count {
            return Err(Error::OutOfRange {
                index,
                count: self.count,
            });
        }

        let base = record_address(index - 1);
        let mut bytes = [0u8; TestRecord::SIZE];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.store.read_byte(base + offset as u16);
        }
        Ok(TestRecord::from_bytes(&bytes))
    }

    /// All reachable records, oldest first.
    pub fn records(&mut self) -> Vec<TestRecord> {
        (1..=self.count).filter_map(|i| self.read(i).ok()).collect()
    }

    /// Raw bytes of every reachable record, in slot order.
    pub fn stored_bytes(&mut self) -> Vec<u8> {
        let len = self.count as u16 * TestRecord::SIZE as u16;
        (0..len)
            .map(|offset| self.store.read_byte(RECORD_BASE + offset))
            .collect()
    }

    /// Forget every record.
    pub fn clear_all(&mut self) {
        info!("Clearing {} stored tests", self.count);
        self.count = 0;
        self.store.write_byte(address::COUNT, 0);
    }

    /// Load the configuration block.
    ///
    /// Unknown codes load as their defaults. An unknown units code is also
    /// corrected in the store.
    pub fn load_settings(&mut self) -> (Settings, Calibration) {
        let mut bytes = [0u8; Settings::SIZE];
        for (byte, addr) in bytes.iter_mut().zip(address::SETTINGS) {
            *byte = self.store.read_byte(addr);
        }

        let units = bytes[4];
        if Units::from_raw(units).is_none() {
            warn!("Stored units code {} invalid, resetting to PSI", units);
            self.store
                .write_byte(address::UNITS, Units::Imperial.to_raw());
        }

        let settings = Settings::from_bytes(bytes);
        let calibration = Calibration::new(
            self.store.read_byte(address::ZERO),
            self.store.read_byte(address::FULL_SCALE),
        );
        debug!("Loaded {:?}, {:?}", settings, calibration);
        (settings, calibration)
    }

    /// Persist the six settings fields.
    pub fn save_settings(&mut self, settings: &Settings) {
        for (addr, byte) in address::SETTINGS.into_iter().zip(settings.to_bytes()) {
            self.store.write_byte(addr, byte);
        }
        info!("Saved {:?}", settings);
    }

    /// Persist both calibration readings of one run.
    pub fn save_calibration(&mut self, calibration: &Calibration) {
        self.store.write_byte(address::ZERO, calibration.zero);
        self.store.write_byte(address::FULL_SCALE, calibration.full_scale);
        if calibration.scale().is_none() {
            warn!(
                "Calibration span {}..{} too small, readings will not scale",
                calibration.zero, calibration.full_scale
            );
        }
        info!("Saved {:?}", calibration);
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        AggregateSize, ClockTime, Density, HardnessClass, PowerLevel, WeightClass,
    };
    use crate::hal::eeprom::MockNonvolatileStore;
    use crate::hal::MemoryEeprom;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn record(sample: u8) -> TestRecord {
        TestRecord::new(
            ClockTime::new(5, 17, 24, 10, 42, false).unwrap(),
            Settings::default(),
            Calibration::new(10, 110),
            [sample, sample + 1, sample + 2],
        )
    }

    fn empty_store() -> (MemoryEeprom, RecordStore<MemoryEeprom>) {
        let eeprom = MemoryEeprom::new();
        eeprom.poke(address::COUNT, 0);
        let store = RecordStore::new(eeprom.clone());
        (eeprom, store)
    }

    #[test]
    fn test_blank_count_normalized() {
        let eeprom = MemoryEeprom::new();
        let store = RecordStore::new(eeprom.clone());
        assert_eq!(store.count(), 0);
        assert_eq!(eeprom.peek(address::COUNT), 0);
    }

    #[test]
    fn test_valid_count_not_rewritten() {
        let mut mock = MockNonvolatileStore::new();
        mock.expect_read_byte()
            .with(eq(address::COUNT))
            .return_const(42u8);
        mock.expect_write_byte().never();
        let store = RecordStore::new(mock);
        assert_eq!(store.count(), 42);
    }

    #[test]
    fn test_append_then_read() {
        let (eeprom, mut store) = empty_store();
        let first = record(50);
        let second = record(60);
        assert_eq!(store.append(&first), Ok(1));
        assert_eq!(store.append(&second), Ok(2));

        assert_eq!(store.read(1), Ok(first));
        assert_eq!(store.read(2), Ok(second));
        assert_eq!(eeprom.peek(address::COUNT), 2);
        // Second record starts at byte 16
        assert_eq!(eeprom.peek(16 + 13), 60);
    }

    #[test]
    fn test_read_out_of_range() {
        let (_, mut store) = empty_store();
        store.append(&record(50)).unwrap();
        assert_eq!(store.read(0), Err(Error::OutOfRange { index: 0, count: 1 }));
        assert_eq!(store.read(2), Err(Error::OutOfRange { index: 2, count: 1 }));
    }

    #[test]
    fn test_append_when_full() {
        let eeprom = MemoryEeprom::new();
        eeprom.poke(address::COUNT, MAX_RECORDS);
        let mut store = RecordStore::new(eeprom.clone());
        assert!(store.is_full());
        assert_eq!(
            store.append(&record(50)),
            Err(Error::CapacityExceeded { capacity: 99 })
        );
        assert_eq!(eeprom.peek(address::COUNT), 99);
    }

    #[test]
    fn test_fill_to_capacity() {
        let (_, mut store) = empty_store();
        for i in 0..MAX_RECORDS {
            assert_eq!(store.append(&record(i)), Ok(i + 1));
        }
        assert!(store.append(&record(0)).is_err());
        assert_eq!(store.read(99).unwrap().samples, [98, 99, 100]);
        // Last record ends before the configuration block
        assert!(record_address(MAX_RECORDS) <= address::POWER);
    }

    #[test]
    fn test_clear_all_keeps_bytes() {
        let (eeprom, mut store) = empty_store();
        store.append(&record(50)).unwrap();
        let before = eeprom.snapshot();

        store.clear_all();
        assert_eq!(store.count(), 0);
        assert_eq!(store.read(1), Err(Error::OutOfRange { index: 1, count: 0 }));
        assert!(store.records().is_empty());

        let after = eeprom.snapshot();
        assert_eq!(&before[..16], &after[..16]);
        assert_eq!(after[address::COUNT as usize], 0);
    }

    #[test]
    fn test_stored_bytes() {
        let (_, mut store) = empty_store();
        let first = record(50);
        store.append(&first).unwrap();
        assert_eq!(store.stored_bytes(), first.to_bytes().to_vec());
    }

    #[test]
    fn test_settings_round_trip() {
        let (_, mut store) = empty_store();
        let settings = Settings {
            power: PowerLevel::Low,
            density: Density::Light,
            weight: WeightClass::Low,
            hardness: HardnessClass::Moh3,
            units: Units::Metric,
            aggregate: AggregateSize::Large,
        };
        store.save_settings(&settings);
        store.save_calibration(&Calibration::new(12, 140));

        let (loaded, calibration) = store.load_settings();
        assert_eq!(loaded, settings);
        assert_eq!(calibration, Calibration::new(12, 140));
    }

    #[test]
    fn test_invalid_units_corrected() {
        let (eeprom, mut store) = empty_store();
        eeprom.poke(address::POWER, 0xFF);
        let (settings, _) = store.load_settings();
        assert_eq!(settings.units, Units::Imperial);
        assert_eq!(settings.power, PowerLevel::Standard);
        assert_eq!(eeprom.peek(address::UNITS), Units::Imperial.to_raw());
        // Other fields are substituted in memory only
        assert_eq!(eeprom.peek(address::POWER), 0xFF);
    }

    #[test]
    fn test_calibration_written_together() {
        let mut mock = MockNonvolatileStore::new();
        mock.expect_read_byte().return_const(0u8);
        mock.expect_write_byte()
            .with(eq(address::ZERO), eq(20))
            .times(1)
            .return_const(());
        mock.expect_write_byte()
            .with(eq(address::FULL_SCALE), eq(200))
            .times(1)
            .return_const(());
        let mut store = RecordStore::new(mock);
        store.save_calibration(&Calibration::new(20, 200));
    }
}
