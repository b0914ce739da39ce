//! Test record data structures.
//!
//! A completed test is stored as a fixed 16-byte record:
//!
//! | Offset | Contents                                      |
//! |--------|-----------------------------------------------|
//! | 0-4    | RTC minute, hour, day, month, year (BCD)      |
//! | 5-10   | power, density, weight, mohs, units, aggregate|
//! | 11-12  | calibration zero, full scale                  |
//! | 13-15  | the three sub-measurement readings            |

use bytes::{Buf, BufMut};

use super::clock::ClockTime;
use super::settings::{Calibration, Settings};

/// The three raw readings of one test.
pub type Samples = [u8; 3];

/// One completed, validated test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestRecord {
    /// When the test was stored.
    pub stamp: ClockTime,
    /// Configuration in effect during the test.
    pub settings: Settings,
    /// Calibration in effect during the test.
    pub calibration: Calibration,
    /// The three sub-measurement readings.
    pub samples: Samples,
}

impl TestRecord {
    /// Size of an encoded record in bytes.
    pub const SIZE: usize = 16;

    /// Create a new record.
    pub fn new(
        stamp: ClockTime,
        settings: Settings,
        calibration: Calibration,
        samples: Samples,
    ) -> Self {
        Self {
            stamp,
            settings,
            calibration,
            samples,
        }
    }

    /// Average of the three readings (integer division).
    pub fn average(&self) -> u8 {
        average(&self.samples)
    }

    /// Encode to the stored byte layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let mut buf = &mut bytes[..];
        buf.put_slice(&self.stamp.to_bcd());
        buf.put_slice(&self.settings.to_bytes());
        buf.put_u8(self.calibration.zero);
        buf.put_u8(self.calibration.full_scale);
        buf.put_slice(&self.samples);
        bytes
    }

    /// Decode from the stored byte layout.
    ///
    /// Unknown configuration codes decode to their defaults.
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let mut buf = &bytes[..];

        let mut stamp = [0u8; ClockTime::SIZE];
        buf.copy_to_slice(&mut stamp);
        let mut settings = [0u8; Settings::SIZE];
        buf.copy_to_slice(&mut settings);
        let zero = buf.get_u8();
        let full_scale = buf.get_u8();
        let mut samples = [0u8; 3];
        buf.copy_to_slice(&mut samples);

        Self {
            stamp: ClockTime::from_bcd(stamp),
            settings: Settings::from_bytes(settings),
            calibration: Calibration::new(zero, full_scale),
            samples,
        }
    }
}

/// Average of three readings, truncated.
pub fn average(samples: &Samples) -> u8 {
    let total: u16 = samples.iter().map(|&s| s as u16).sum();
    (total / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::settings::*;
    use proptest::prelude::*;

    fn sample_record() -> TestRecord {
        TestRecord::new(
            ClockTime::new(10, 26, 10, 12, 59, true).unwrap(),
            Settings {
                power: PowerLevel::Standard,
                density: Density::Standard,
                weight: WeightClass::High,
                hardness: HardnessClass::Moh5,
                units: Units::Metric,
                aggregate: AggregateSize::Medium,
            },
            Calibration::new(10, 110),
            [50, 52, 55],
        )
    }

    #[test]
    fn test_record_layout() {
        let bytes = sample_record().to_bytes();
        assert_eq!(
            bytes,
            [0x59, 0x72, 0x26, 0x10, 0x10, 1, 4, 16, 8, 11, 13, 10, 110, 50, 52, 55]
        );
    }

    #[test]
    fn test_record_decode() {
        let record = sample_record();
        assert_eq!(TestRecord::from_bytes(&record.to_bytes()), record);
    }

    #[test]
    fn test_average_truncates() {
        assert_eq!(average(&[50, 52, 55]), 52);
        assert_eq!(average(&[255, 255, 255]), 255);
        assert_eq!(average(&[0, 0, 2]), 0);
    }

    fn any_settings() -> impl Strategy<Value = Settings> {
        (1u8..=3, 4u8..=5, 16u8..=19, 6u8..=10, 11u8..=12, 13u8..=15).prop_map(
            |(p, d, w, m, u, a)| Settings::from_bytes([p, d, w, m, u, a]),
        )
    }

    fn any_stamp() -> impl Strategy<Value = ClockTime> {
        (1u8..=12, 1u8..=31, 0u8..=99, 1u8..=12, 0u8..=59, any::<bool>()).prop_map(
            |(mo, d, y, h, mi, pm)| ClockTime::new(mo, d, y, h, mi, pm).unwrap(),
        )
    }

    proptest! {
        #[test]
        fn prop_record_round_trip(
            stamp in any_stamp(),
            settings in any_settings(),
            zero in any::<u8>(),
            full_scale in any::<u8>(),
            samples in any::<[u8; 3]>(),
        ) {
            let record = TestRecord::new(stamp, settings, Calibration::new(zero, full_scale), samples);
            prop_assert_eq!(TestRecord::from_bytes(&record.to_bytes()), record);
        }
    }
}
