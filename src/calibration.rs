//! Reading-to-distance-to-pressure conversion.
//!
//! Distances are in hundredths of a millimetre and pressures in tenths of
//! a megapascal throughout. All arithmetic is integer except the high
//! power curve, which uses a truncated exponential series.

use tracing::{debug, warn};

use crate::data::record::{average, Samples};
use crate::data::settings::{
    AggregateSize, Calibration, HardnessClass, PowerLevel, Settings, WeightClass,
};
use crate::error::{Error, Result};

/// Full probe travel (38.10 mm) in hundredths of a millimetre.
pub const ADC_SCALE_FACTOR_METRIC: u32 = 3810;

/// Exposed probe length at a zero reading (25.40 mm).
pub const DISTANCE_OFFSET_METRIC: i32 = 2540;

/// High power curve: `pressure = 28 * e^(mm * 0.0602)`.
const HIGH_POWER_EXPONENT: f32 = 0.0602;
const HIGH_POWER_MULTIPLIER: i32 = 28;

/// Allowed spread between sub-measurements, in hundredths of a millimetre.
const AGG_SIZE_LIMIT_MEDIUM: u32 = 660;
const AGG_SIZE_LIMIT_SMALL: u32 = 840;
const AGG_SIZE_LIMIT_LARGE: u32 = 1170;

/// One row of the standard/low power calibration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow {
    /// Slope, scaled by 1000 against the distance.
    pub slope: i32,
    /// Offset subtracted after the slope.
    pub offset: i32,
    /// Shortest exposed length that yields a non-zero pressure.
    pub min_distance: i32,
}

impl TableRow {
    const fn new(slope: i32, offset: i32, min_distance: i32) -> Self {
        Self {
            slope,
            offset,
            min_distance,
        }
    }
}

/// Look up the table row for a power level and hardness.
///
/// Returns `None` for [`PowerLevel::High`], which uses the exponential curve.
pub fn table_row(power: PowerLevel, hardness: HardnessClass) -> Option<TableRow> {
    use HardnessClass::*;

    let row = match (power, hardness) {
        (PowerLevel::High, _) => return None,
        (PowerLevel::Standard, Moh3) => TableRow::new(181, 437, 2800),
        (PowerLevel::Standard, Moh4) => TableRow::new(190, 517, 2900),
        (PowerLevel::Standard, Moh5) => TableRow::new(199, 598, 3300),
        (PowerLevel::Standard, Moh6) => TableRow::new(217, 731, 3600),
        (PowerLevel::Standard, Moh7) => TableRow::new(237, 879, 3900),
        (PowerLevel::Low, Moh3) => TableRow::new(91, 220, 2800),
        (PowerLevel::Low, Moh4) => TableRow::new(94, 255, 2900),
        (PowerLevel::Low, Moh5) => TableRow::new(100, 300, 3300),
        (PowerLevel::Low, Moh6) => TableRow::new(109, 365, 3600),
        (PowerLevel::Low, Moh7) => TableRow::new(118, 435, 3900),
    };
    Some(row)
}

/// Reading-to-distance scale factor for a calibration span.
///
/// Returns `None` unless `full_scale - zero > 1`.
///
/// # Example
///
/// ```
/// use windsor_probe::calibration::scale_factor;
///
/// assert_eq!(scale_factor(10, 110), Some(38));
/// assert_eq!(scale_factor(10, 11), None);
/// ```
pub fn scale_factor(zero: u8, full_scale: u8) -> Option<u32> {
    let span = full_scale.checked_sub(zero)?.checked_sub(1)?;
    if span == 0 {
        return None;
    }
    Some(ADC_SCALE_FACTOR_METRIC / span as u32)
}

/// Exposed probe length for a reading.
pub fn distance(reading: u8, zero: u8, scale: u32) -> i32 {
    DISTANCE_OFFSET_METRIC + (reading as i32 - zero as i32) * scale as i32
}

/// Truncated Maclaurin series for `e^x`, summed through the x⁶/720 term
/// and truncated to an integer.
///
/// The high power table was fitted with all seven terms (1 through x⁶/720);
/// the x⁶ term is part of the curve, not a precision choice.
pub fn exp_series(x: f32) -> i32 {
    let mut term = x * x / 2.0;
    let mut sum = 1.0 + x + term;
    for n in 3..=6 {
        term = term * x / n as f32;
        sum += term;
    }
    sum as i32
}

/// Pressure for a distance before the minimum-distance clamp.
///
/// Computed in 64 bits and saturated to the `i32` range, so a steep high
/// power curve on a narrow calibration span cannot overflow.
pub fn unclamped_pressure(
    distance: i32,
    power: PowerLevel,
    hardness: HardnessClass,
    weight: WeightClass,
) -> i32 {
    let pressure = match table_row(power, hardness) {
        Some(row) => i64::from(row.slope) * i64::from(distance) / 1000 - i64::from(row.offset),
        None => {
            let millimetres = distance as f32 / 100.0;
            i64::from(HIGH_POWER_MULTIPLIER)
                * i64::from(exp_series(millimetres * HIGH_POWER_EXPONENT))
        }
    };
    let scaled = pressure * i64::from(weight.scale_percent()) / 100;
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Pressure in tenths of a megapascal.
///
/// Distances shorter than the table row's minimum read as zero.
pub fn pressure(
    distance: i32,
    power: PowerLevel,
    hardness: HardnessClass,
    weight: WeightClass,
) -> i32 {
    let min_distance = table_row(power, hardness).map_or(0, |row| row.min_distance);
    if distance < min_distance {
        return 0;
    }
    unclamped_pressure(distance, power, hardness, weight)
}

/// A converted reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Raw ADC reading.
    pub reading: u8,
    /// Exposed length in hundredths of a millimetre.
    pub distance: i32,
    /// Pressure in tenths of a megapascal.
    pub pressure: i32,
}

impl Measurement {
    /// Convert a reading under the given configuration.
    ///
    /// An uncalibrated probe uses a zero scale, so every reading maps to
    /// the bare offset distance.
    pub fn convert(reading: u8, settings: &Settings, calibration: &Calibration) -> Self {
        let scale = calibration.scale().unwrap_or(0);
        let distance = distance(reading, calibration.zero, scale);
        let pressure = pressure(distance, settings.power, settings.hardness, settings.weight);
        Self {
            reading,
            distance,
            pressure,
        }
    }
}

/// Largest allowed reading spread for an aggregate size.
///
/// Without a usable scale factor every spread is accepted.
pub fn tolerance(aggregate: AggregateSize, scale: u32) -> u32 {
    let limit = match aggregate {
        AggregateSize::Medium => AGG_SIZE_LIMIT_MEDIUM,
        AggregateSize::Small => AGG_SIZE_LIMIT_SMALL,
        AggregateSize::Large => AGG_SIZE_LIMIT_LARGE,
    };
    limit.checked_div(scale).unwrap_or(u32::MAX)
}

/// What the operator must measure again after a failed consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Repeat {
    /// Discard all three readings.
    EntireTest,
    /// Retake one reading (1-3).
    SubTest(u8),
    /// The failure pattern names no single reading; nothing is retaken.
    Unresolved,
}

/// Result of comparing the three readings pairwise.
///
/// Each out-of-tolerance direction adds its weight to `code`:
/// s0>s1 = 1, s0>s2 = 10, s1>s0 = 3, s1>s2 = 30, s2>s0 = 5, s2>s1 = 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairwiseFailures {
    /// Sum of the failing direction weights.
    pub code: u8,
    /// Number of failing pairs (0-3).
    pub count: u8,
}

impl PairwiseFailures {
    /// Compare all three pairs of readings.
    pub fn evaluate(samples: &Samples, tolerance: u32) -> Self {
        const DIRECTIONS: [(usize, usize, u8); 6] =
            [(0, 1, 1), (0, 2, 10), (1, 0, 3), (1, 2, 30), (2, 0, 5), (2, 1, 50)];

        let mut failures = Self::default();
        for (high, low, weight) in DIRECTIONS {
            let spread = samples[high].saturating_sub(samples[low]);
            if spread as u32 > tolerance {
                failures.code += weight;
                failures.count += 1;
            }
        }
        failures
    }

    /// The single reading singled out by this failure code, if any.
    ///
    /// Codes 8/11 name reading 1, 33/51 reading 2, 40/55 reading 3.
    pub fn outlier(&self) -> Option<u8> {
        match self.code {
            8 | 11 => Some(1),
            33 | 51 => Some(2),
            40 | 55 => Some(3),
            _ => None,
        }
    }
}

/// Check three sub-measurements for consistency.
///
/// On success returns their average. `retrying` is set when the previous
/// check of this test already failed; a second failure always discards
/// the whole test.
///
/// # Errors
///
/// Returns [`Error::ToleranceExceeded`] naming what to repeat.
pub fn check_samples(samples: &Samples, tolerance: u32, retrying: bool) -> Result<u8> {
    let failures = PairwiseFailures::evaluate(samples, tolerance);
    if failures.count == 0 {
        let average = average(samples);
        debug!("Samples {:?} consistent, average {}", samples, average);
        return Ok(average);
    }

    let repeat = if failures.count > 2 || retrying {
        Repeat::EntireTest
    } else {
        failures.outlier().map_or(Repeat::Unresolved, Repeat::SubTest)
    };
    warn!(
        "Samples {:?} out of tolerance {} (code {}), repeat {:?}",
        samples, tolerance, failures.code, repeat
    );

    Err(Error::ToleranceExceeded {
        repeat,
        failures: failures.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::settings::{Density, Units};
    use proptest::prelude::*;

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(10, 110), Some(38));
        assert_eq!(scale_factor(0, 255), Some(15));
        assert_eq!(scale_factor(10, 12), Some(3810));
        assert_eq!(scale_factor(10, 11), None);
        assert_eq!(scale_factor(10, 10), None);
        assert_eq!(scale_factor(110, 10), None);
    }

    #[test]
    fn test_scale_factor_positive_for_any_span() {
        for zero in 0..=253u8 {
            for full_scale in (zero + 2)..=255 {
                assert!(scale_factor(zero, full_scale).unwrap() > 0);
            }
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(10, 10, 38), 2540);
        assert_eq!(distance(60, 10, 38), 4440);
        assert_eq!(distance(5, 10, 38), 2350);
    }

    #[test]
    fn test_exp_series() {
        assert_eq!(exp_series(0.0), 1);
        assert_eq!(exp_series(1.0), 2);
        // e^3.01 ≈ 20.3, the truncated series falls just short
        assert_eq!(exp_series(3.01), 19);
    }

    #[test]
    fn test_table_pressure_at_zero_distance() {
        for hardness in [
            HardnessClass::Moh3,
            HardnessClass::Moh4,
            HardnessClass::Moh5,
            HardnessClass::Moh6,
            HardnessClass::Moh7,
        ] {
            for power in [PowerLevel::Standard, PowerLevel::Low] {
                let row = table_row(power, hardness).unwrap();
                assert_eq!(
                    unclamped_pressure(0, power, hardness, WeightClass::High),
                    -row.offset
                );
                assert_eq!(pressure(0, power, hardness, WeightClass::High), 0);
            }
        }
    }

    #[test]
    fn test_table_pressure() {
        let p = pressure(5000, PowerLevel::Standard, HardnessClass::Moh5, WeightClass::High);
        assert_eq!(p, 199 * 5000 / 1000 - 598);

        let p = pressure(5000, PowerLevel::Low, HardnessClass::Moh5, WeightClass::High);
        assert_eq!(p, 200);
    }

    #[test]
    fn test_min_distance_clamp() {
        let below = pressure(3299, PowerLevel::Low, HardnessClass::Moh5, WeightClass::High);
        let at = pressure(3300, PowerLevel::Low, HardnessClass::Moh5, WeightClass::High);
        assert_eq!(below, 0);
        assert_eq!(at, 30);
    }

    #[test]
    fn test_high_power_curve() {
        let p = pressure(5000, PowerLevel::High, HardnessClass::Moh3, WeightClass::High);
        assert_eq!(p, 28 * 19);
        // No minimum distance on the high power curve
        let p = pressure(0, PowerLevel::High, HardnessClass::Moh7, WeightClass::High);
        assert_eq!(p, 28);
    }

    #[test]
    fn test_weight_scaling() {
        let full = pressure(5000, PowerLevel::Low, HardnessClass::Moh5, WeightClass::Medium);
        let low = pressure(5000, PowerLevel::Low, HardnessClass::Moh5, WeightClass::Low);
        let super_low = pressure(5000, PowerLevel::Low, HardnessClass::Moh5, WeightClass::SuperLow);
        assert_eq!(full, 200);
        assert_eq!(low, 168);
        assert_eq!(super_low, 132);
    }

    #[test]
    fn test_measurement_scenario() {
        let settings = Settings {
            power: PowerLevel::Standard,
            density: Density::Standard,
            hardness: HardnessClass::Moh5,
            weight: WeightClass::High,
            aggregate: AggregateSize::Medium,
            units: Units::Metric,
        };
        let calibration = Calibration::new(10, 110);
        let m = Measurement::convert(60, &settings, &calibration);
        assert_eq!(m.distance, 2540 + 50 * 38);
        assert_eq!(m.pressure, 199 * 4440 / 1000 - 598);

        // Below the Moh5 minimum distance the pressure is exactly zero
        let m = Measurement::convert(20, &settings, &calibration);
        assert_eq!(m.distance, 2920);
        assert_eq!(m.pressure, 0);
    }

    #[test]
    fn test_uncalibrated_measurement() {
        let m = Measurement::convert(200, &Settings::default(), &Calibration::new(0xFF, 0xFF));
        assert_eq!(m.distance, DISTANCE_OFFSET_METRIC);
    }

    #[test]
    fn test_high_power_narrow_span() {
        let settings = Settings {
            power: PowerLevel::High,
            weight: WeightClass::High,
            ..Settings::default()
        };
        let calibration = Calibration::new(0, 20);
        let m = Measurement::convert(255, &settings, &calibration);
        assert_eq!(m.distance, 2540 + 255 * 200);
        assert!(m.pressure > 0);

        let light = Measurement::convert(
            255,
            &Settings {
                weight: WeightClass::SuperLow,
                ..settings
            },
            &calibration,
        );
        assert!(light.pressure > 0 && light.pressure < m.pressure);
    }

    #[test]
    fn test_pressure_saturates() {
        assert_eq!(
            pressure(i32::MAX, PowerLevel::High, HardnessClass::Moh3, WeightClass::Medium),
            i32::MAX
        );
        let table = pressure(i32::MAX, PowerLevel::Standard, HardnessClass::Moh7, WeightClass::Low);
        assert!(table > 0);
    }

    #[test]
    fn test_tolerance() {
        assert_eq!(tolerance(AggregateSize::Medium, 38), 17);
        assert_eq!(tolerance(AggregateSize::Small, 38), 22);
        assert_eq!(tolerance(AggregateSize::Large, 38), 30);
        assert_eq!(tolerance(AggregateSize::Large, 0), u32::MAX);
    }

    #[test]
    fn test_pairwise_codes() {
        let f = PairwiseFailures::evaluate(&[50, 52, 90], 17);
        assert_eq!(f, PairwiseFailures { code: 55, count: 2 });
        assert_eq!(f.outlier(), Some(3));

        let f = PairwiseFailures::evaluate(&[90, 50, 52], 17);
        assert_eq!(f, PairwiseFailures { code: 11, count: 2 });
        assert_eq!(f.outlier(), Some(1));

        let f = PairwiseFailures::evaluate(&[50, 10, 52], 17);
        assert_eq!(f, PairwiseFailures { code: 51, count: 2 });
        assert_eq!(f.outlier(), Some(2));
    }

    #[test]
    fn test_check_samples_consistent() {
        assert_eq!(check_samples(&[50, 52, 55], 17, false), Ok(52));
        assert_eq!(check_samples(&[50, 52, 55], 17, true), Ok(52));
    }

    #[test]
    fn test_check_samples_single_outlier() {
        assert_eq!(
            check_samples(&[50, 52, 90], 17, false),
            Err(Error::ToleranceExceeded {
                repeat: Repeat::SubTest(3),
                failures: 2,
            })
        );
    }

    #[test]
    fn test_check_samples_retry_fails_entire_test() {
        assert_eq!(
            check_samples(&[50, 52, 90], 17, true),
            Err(Error::ToleranceExceeded {
                repeat: Repeat::EntireTest,
                failures: 2,
            })
        );
    }

    #[test]
    fn test_check_samples_all_pairs_fail() {
        assert_eq!(
            check_samples(&[10, 50, 90], 17, false),
            Err(Error::ToleranceExceeded {
                repeat: Repeat::EntireTest,
                failures: 3,
            })
        );
    }

    #[test]
    fn test_check_samples_unresolved() {
        // Only readings 1 and 3 disagree; reading 2 sits between them
        assert_eq!(
            check_samples(&[40, 50, 60], 17, false),
            Err(Error::ToleranceExceeded {
                repeat: Repeat::Unresolved,
                failures: 1,
            })
        );
    }

    proptest! {
        #[test]
        fn prop_scale_factor_positive(zero in 0u8..=253, span in 2u8..=255) {
            let full_scale = zero.saturating_add(span);
            let scale = scale_factor(zero, full_scale);
            prop_assert!(matches!(scale, Some(s) if s > 0));
            prop_assert_eq!(scale, scale_factor(zero, full_scale));
        }
    }
}
