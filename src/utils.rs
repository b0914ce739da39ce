//! Utility functions for the windsor-probe crate.

/// Inches per millimetre, as used by the distance readout.
pub const DISTANCE_CONV_FACTOR: f64 = 3.937;

/// Convert a pressure in tenths of a megapascal to whole PSI.
///
/// Uses the fixed-point factor 145/10 rather than the exact
/// 1.4503773773, so readings match the instrument's printed tables.
///
/// # Example
///
/// ```
/// use windsor_probe::deci_mpa_to_psi;
///
/// // 39.7 MPa
/// assert_eq!(deci_mpa_to_psi(397), 5756);
/// ```
#[inline]
pub fn deci_mpa_to_psi(deci_mpa: i32) -> i32 {
    let psi = i64::from(deci_mpa) * 145 / 10;
    psi.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Convert a distance in hundredths of a millimetre to ten-thousandths
/// of an inch.
///
/// # Example
///
/// ```
/// use windsor_probe::hundredths_mm_to_inch_ticks;
///
/// // 25.40 mm is one inch
/// assert_eq!(hundredths_mm_to_inch_ticks(2540), 10_000);
/// ```
#[inline]
pub fn hundredths_mm_to_inch_ticks(hundredths_mm: i32) -> i32 {
    (hundredths_mm as f64 * DISTANCE_CONV_FACTOR).round() as i32
}

/// Decode a packed BCD byte (tens in the high nibble).
#[inline]
pub fn bcd_to_decimal(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Encode a value below 100 as packed BCD.
#[inline]
pub fn decimal_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
