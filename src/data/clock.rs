//! Real-time clock data structures.
//!
//! The RTC keeps its registers in packed BCD with the hour register in
//! 12-hour mode. Test records store those registers verbatim.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};
use crate::utils::decimal_to_bcd;

/// Hour register bit selecting 12-hour mode.
pub const HOUR_12H_MODE: u8 = 0x40;

/// Hour register bit set for PM.
pub const HOUR_PM: u8 = 0x20;

/// A wall-clock reading with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime {
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
    /// Two-digit year (0-99).
    pub year: u8,
    /// Hour in 12-hour format (1-12).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Afternoon flag.
    pub is_pm: bool,
}

impl ClockTime {
    /// Size of the packed register form in bytes.
    pub const SIZE: usize = 5;

    /// Create a validated clock reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any field is outside its range.
    pub fn new(month: u8, day: u8, year: u8, hour: u8, minute: u8, is_pm: bool) -> Result<Self> {
        let check = |name: &str, value: u8, min: u8, max: u8| {
            if (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(Error::InvalidParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                })
            }
        };
        check("month", month, 1, 12)?;
        check("day", day, 1, 31)?;
        check("year", year, 0, 99)?;
        check("hour", hour, 1, 12)?;
        check("minute", minute, 0, 59)?;

        Ok(Self {
            month,
            day,
            year,
            hour,
            minute,
            is_pm,
        })
    }

    /// Encode as RTC registers: minute, hour, day, month, year.
    pub fn to_bcd(&self) -> [u8; Self::SIZE] {
        let meridiem = if self.is_pm { HOUR_PM } else { 0 };
        [
            decimal_to_bcd(self.minute),
            HOUR_12H_MODE | meridiem | decimal_to_bcd(self.hour),
            decimal_to_bcd(self.day),
            decimal_to_bcd(self.month),
            decimal_to_bcd(self.year),
        ]
    }

    /// Decode RTC registers: minute, hour, day, month, year.
    ///
    /// Tens nibbles are masked to the widths the RTC defines for each
    /// register, so control bits never leak into the digits.
    pub fn from_bcd(registers: [u8; Self::SIZE]) -> Self {
        let [minute, hour, day, month, year] = registers;
        let digits = |value: u8, tens_mask: u8| ((value >> 4) & tens_mask) * 10 + (value & 0x0F);

        Self {
            minute: digits(minute, 0x07),
            hour: digits(hour, 0x01),
            is_pm: hour & HOUR_PM != 0,
            day: digits(day, 0x03),
            month: digits(month, 0x03),
            year: digits(year, 0x0F),
        }
    }

    /// Hour in 24-hour format (0-23).
    pub fn hour_24(&self) -> u8 {
        match (self.hour % 12, self.is_pm) {
            (h, false) => h,
            (h, true) => h + 12,
        }
    }

    /// Convert to a calendar date-time, assuming the 2000s.
    ///
    /// Returns `None` if the registers hold an impossible date.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2000 + self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hour_24() as u32, self.minute as u32, 0)
    }

    /// Create from a calendar date-time. Years wrap to two digits.
    pub fn from_naive_datetime(datetime: &NaiveDateTime) -> Self {
        let (is_pm, hour) = datetime.hour12();
        Self {
            month: datetime.month() as u8,
            day: datetime.day() as u8,
            year: datetime.year().rem_euclid(100) as u8,
            hour: hour as u8,
            minute: datetime.minute() as u8,
            is_pm,
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self {
            month: 1,
            day: 1,
            year: 0,
            hour: 12,
            minute: 0,
            is_pm: false,
        }
    }
}
