//! Fixed-width field formatting.
//!
//! Every field has a constant width so screens line up column for column
//! whatever the value. Values that do not fit are clamped to the largest
//! (or smallest) value the field can show.

use super::line::{Frame, LineBuffer};
use crate::calibration::Measurement;
use crate::data::{AggregateSize, ClockTime, Density, PowerLevel, Settings, Units, WeightClass};
use crate::hal::Row;
use crate::utils::{deci_mpa_to_psi, hundredths_mm_to_inch_ticks};

/// Largest value a five-digit field can show.
const FIELD_MAX: i32 = 99_999;

/// Extra text shown after the distance on line 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Annotation {
    /// Plain live reading.
    #[default]
    None,
    /// One sub-measurement, optionally of a stored test.
    Sample {
        /// Stored test number, when browsing stored tests.
        test: Option<u8>,
        /// Sub-measurement number shown after `No:`.
        sub_test: u8,
    },
    /// The average of a completed test.
    Average {
        /// Stored test number, when browsing stored tests.
        test: Option<u8>,
    },
}

fn digits<const N: usize>(value: i32) -> [u8; N] {
    let mut value = value;
    let mut out = [0u8; N];
    for slot in out.iter_mut().rev() {
        *slot = (value % 10) as u8;
        value /= 10;
    }
    out
}

/// Append the 8-character distance field: `mm:DD.D ` or `in:D.DD `.
pub fn push_distance(line: &mut LineBuffer, distance: i32, units: Units) -> &mut LineBuffer {
    let (label, thousandths) = if units.is_metric() {
        ("mm:", distance.saturating_mul(10))
    } else {
        ("in:", hundredths_mm_to_inch_ticks(distance))
    };
    let [d0, d1, d2] = digits::<3>(thousandths.clamp(0, FIELD_MAX) / 100);

    line.push_str(label);
    if units.is_metric() {
        line.push_digit(d0).push_digit(d1).push('.').push_digit(d2);
    } else {
        line.push_digit(d0).push('.').push_digit(d1).push_digit(d2);
    }
    line.push(' ')
}

/// Append the pressure field: `MPA:DDDD.D  ` or `PSI:DDDDD  `.
pub fn push_pressure(line: &mut LineBuffer, deci_mpa: i32, units: Units) -> &mut LineBuffer {
    let value = if units.is_metric() {
        line.push_str("MPA:");
        deci_mpa
    } else {
        line.push_str("PSI:");
        deci_mpa_to_psi(deci_mpa)
    };

    let digits = digits::<5>(value.clamp(0, FIELD_MAX));
    for (i, digit) in digits.into_iter().enumerate() {
        if i == 4 && units.is_metric() {
            line.push('.');
        }
        line.push_digit(digit);
    }
    line.push_str("  ")
}

/// Append the short settings code, e.g. `Ss5M`, `LlhS` or `HP L`.
///
/// A super-low weight class has no letter of its own and is left out.
pub fn push_settings_code<'a>(
    line: &'a mut LineBuffer,
    settings: &Settings,
) -> &'a mut LineBuffer {
    match settings.power {
        PowerLevel::High => {
            line.push_str("HP ");
        }
        power => {
            line.push(if power == PowerLevel::Standard { 'S' } else { 'L' });
            match settings.density {
                Density::Standard => {
                    line.push('s').push_digit(settings.hardness.mohs());
                }
                Density::Light => {
                    line.push('l');
                    match settings.weight {
                        WeightClass::High => {
                            line.push('h');
                        }
                        WeightClass::Medium => {
                            line.push('m');
                        }
                        WeightClass::Low => {
                            line.push('l');
                        }
                        WeightClass::SuperLow => {}
                    }
                }
            }
        }
    }
    line.push(match settings.aggregate {
        AggregateSize::Medium => 'M',
        AggregateSize::Small => 'S',
        AggregateSize::Large => 'L',
    })
}

/// Format a clock reading as `MM/DD/YY HH:MMA`.
///
/// The hour's tens digit is blank below 10, except while the clock is
/// being edited, where it shows `0` so every field has two digits.
pub fn clock_line(time: &ClockTime, editing: bool) -> LineBuffer {
    let mut line = LineBuffer::new();
    line.push_decimal2(time.month)
        .push('/')
        .push_decimal2(time.day)
        .push('/')
        .push_decimal2(time.year)
        .push(' ');
    match time.hour {
        10..=12 => line.push('1'),
        _ if editing => line.push('0'),
        _ => line.push(' '),
    };
    line.push_digit(time.hour % 10)
        .push(':')
        .push_decimal2(time.minute)
        .push(if time.is_pm { 'P' } else { 'A' });
    line
}

fn push_test_number(line: &mut LineBuffer, test: Option<u8>) -> &mut LineBuffer {
    match test {
        Some(number) => line.push('T').push_decimal2(number),
        None => line.push_str("   "),
    }
}

/// Render a converted reading on both lines.
pub fn measurement_frame(
    measurement: &Measurement,
    settings: &Settings,
    annotation: Annotation,
) -> Frame {
    let mut frame = Frame::new();

    let line = frame.line_mut(Row::First);
    push_distance(line, measurement.distance, settings.units);
    match annotation {
        Annotation::None => {}
        Annotation::Sample { test, sub_test } => {
            push_test_number(line, test).push_str(" No:").push_digit(sub_test);
        }
        Annotation::Average { test } => {
            push_test_number(line, test).push_str(" Ave");
        }
    }

    let line = frame.line_mut(Row::Second);
    push_pressure(line, measurement.pressure, settings.units);
    push_settings_code(line, settings);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HardnessClass;
    use pretty_assertions::assert_eq;

    fn field<F: FnOnce(&mut LineBuffer)>(f: F) -> String {
        let mut line = LineBuffer::new();
        f(&mut line);
        line.as_str().to_string()
    }

    #[test]
    fn test_distance_field() {
        assert_eq!(
            field(|l| {
                push_distance(l, 4440, Units::Metric);
            }),
            "mm:44.4         "
        );
        assert_eq!(
            field(|l| {
                push_distance(l, 2540, Units::Imperial);
            }),
            "in:1.00         "
        );
    }

    #[test]
    fn test_distance_field_clamps() {
        assert_eq!(
            field(|l| {
                push_distance(l, -500, Units::Metric);
            })
            .trim_end(),
            "mm:00.0"
        );
        assert_eq!(
            field(|l| {
                push_distance(l, 20_000, Units::Metric);
            })
            .trim_end(),
            "mm:99.9"
        );
    }

    #[test]
    fn test_pressure_field() {
        assert_eq!(
            field(|l| {
                push_pressure(l, 397, Units::Metric);
            }),
            "MPA:0039.7      "
        );
        assert_eq!(
            field(|l| {
                push_pressure(l, 397, Units::Imperial);
            }),
            "PSI:05756       "
        );
        assert_eq!(
            field(|l| {
                push_pressure(l, 0, Units::Metric);
            })
            .trim_end(),
            "MPA:0000.0"
        );
    }

    #[test]
    fn test_pressure_field_clamps() {
        assert_eq!(
            field(|l| {
                push_pressure(l, i32::MAX, Units::Imperial);
            })
            .trim_end(),
            "PSI:99999"
        );
        assert_eq!(
            field(|l| {
                push_pressure(l, i32::MAX, Units::Metric);
            })
            .trim_end(),
            "MPA:9999.9"
        );
    }

    #[test]
    fn test_high_power_frame_on_narrow_span() {
        let settings = Settings {
            power: PowerLevel::High,
            units: Units::Imperial,
            ..Settings::default()
        };
        let m = Measurement::convert(255, &settings, &crate::data::Calibration::new(0, 20));
        let frame = measurement_frame(&m, &settings, Annotation::None);
        assert_eq!(frame.line(Row::Second).trimmed(), "PSI:99999  HP M");
    }

    #[test]
    fn test_settings_code() {
        let mut settings = Settings {
            power: PowerLevel::Standard,
            hardness: HardnessClass::Moh5,
            aggregate: AggregateSize::Medium,
            ..Settings::default()
        };
        assert_eq!(field(|l| { push_settings_code(l, &settings); }).trim_end(), "Ss5M");

        settings.power = PowerLevel::Low;
        settings.density = Density::Light;
        settings.weight = WeightClass::Medium;
        settings.aggregate = AggregateSize::Large;
        assert_eq!(field(|l| { push_settings_code(l, &settings); }).trim_end(), "LlmL");

        settings.power = PowerLevel::High;
        assert_eq!(field(|l| { push_settings_code(l, &settings); }).trim_end(), "HP L");
    }

    #[test]
    fn test_clock_line() {
        let time = ClockTime::new(3, 7, 24, 9, 5, true).unwrap();
        assert_eq!(clock_line(&time, false).trimmed(), "03/07/24  9:05P");
        assert_eq!(clock_line(&time, true).trimmed(), "03/07/24 09:05P");

        let time = ClockTime::new(12, 31, 99, 12, 59, false).unwrap();
        assert_eq!(clock_line(&time, false).trimmed(), "12/31/99 12:59A");
    }

    #[test]
    fn test_measurement_frames() {
        let settings = Settings {
            units: Units::Metric,
            hardness: HardnessClass::Moh5,
            ..Settings::default()
        };
        let m = Measurement {
            reading: 60,
            distance: 4440,
            pressure: 285,
        };

        let frame = measurement_frame(&m, &settings, Annotation::None);
        assert_eq!(frame.line(Row::First).as_str(), "mm:44.4         ");
        assert_eq!(frame.line(Row::Second).as_str(), "MPA:0028.5  Ss5M");

        let frame = measurement_frame(
            &m,
            &settings,
            Annotation::Sample {
                test: None,
                sub_test: 2,
            },
        );
        assert_eq!(frame.line(Row::First).as_str(), "mm:44.4     No:2");

        let frame = measurement_frame(
            &m,
            &settings,
            Annotation::Sample {
                test: Some(7),
                sub_test: 1,
            },
        );
        assert_eq!(frame.line(Row::First).as_str(), "mm:44.4 T07 No:1");

        let frame = measurement_frame(&m, &settings, Annotation::Average { test: Some(12) });
        assert_eq!(frame.line(Row::First).as_str(), "mm:44.4 T12 Ave ");
    }
}
