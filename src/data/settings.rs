//! Operator configuration and calibration data structures.
//!
//! Every enumeration persists as the menu code the instrument has always
//! written to EEPROM, so records taken by older firmware decode unchanged.

/// Probe power level (spring/charge selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PowerLevel {
    /// Standard power.
    #[default]
    Standard = 1,
    /// Low power, for soft or young concrete.
    Low = 2,
    /// High performance power.
    High = 3,
}

impl PowerLevel {
    /// Lowest menu code.
    pub const MIN_RAW: u8 = 1;
    /// Highest menu code.
    pub const MAX_RAW: u8 = 3;

    /// Create from a persisted menu code.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Standard),
            2 => Some(Self::Low),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Convert to the persisted menu code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }
}

/// Concrete density class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Density {
    /// Standard weight concrete; pressure is selected by Mohs hardness.
    #[default]
    Standard = 4,
    /// Lightweight concrete; pressure is scaled by weight class.
    Light = 5,
}

impl Density {
    /// Lowest menu code.
    pub const MIN_RAW: u8 = 4;
    /// Highest menu code.
    pub const MAX_RAW: u8 = 5;

    /// Create from a persisted menu code.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            4 => Some(Self::Standard),
            5 => Some(Self::Light),
            _ => None,
        }
    }

    /// Convert to the persisted menu code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }
}

/// Mohs hardness of the coarse aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum HardnessClass {
    /// Mohs 3.
    #[default]
    Moh3 = 6,
    /// Mohs 4.
    Moh4 = 7,
    /// Mohs 5.
    Moh5 = 8,
    /// Mohs 6.
    Moh6 = 9,
    /// Mohs 7.
    Moh7 = 10,
}

impl HardnessClass {
    /// Lowest menu code.
    pub const MIN_RAW: u8 = 6;
    /// Highest menu code.
    pub const MAX_RAW: u8 = 10;

    /// Create from a persisted menu code.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            6 => Some(Self::Moh3),
            7 => Some(Self::Moh4),
            8 => Some(Self::Moh5),
            9 => Some(Self::Moh6),
            10 => Some(Self::Moh7),
            _ => None,
        }
    }

    /// Convert to the persisted menu code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }

    /// The Mohs number (3-7).
    pub fn mohs(&self) -> u8 {
        self.to_raw() - 3
    }
}

/// Display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Units {
    /// Millimetres and megapascals.
    Metric = 11,
    /// Inches and PSI.
    #[default]
    Imperial = 12,
}

impl Units {
    /// Lowest menu code.
    pub const MIN_RAW: u8 = 11;
    /// Highest menu code.
    pub const MAX_RAW: u8 = 12;

    /// Create from a persisted menu code.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            11 => Some(Self::Metric),
            12 => Some(Self::Imperial),
            _ => None,
        }
    }

    /// Convert to the persisted menu code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }

    /// Check if readings are shown in metric units.
    pub fn is_metric(&self) -> bool {
        matches!(self, Self::Metric)
    }
}

/// Coarse aggregate size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AggregateSize {
    /// Mortar / medium aggregate.
    #[default]
    Medium = 13,
    /// 25 mm (1 in.) aggregate.
    Small = 14,
    /// 50 mm (2 in.) aggregate.
    Large = 15,
}

impl AggregateSize {
    /// Lowest menu code.
    pub const MIN_RAW: u8 = 13;
    /// Highest menu code.
    pub const MAX_RAW: u8 = 15;

    /// Create from a persisted menu code.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            13 => Some(Self::Medium),
            14 => Some(Self::Small),
            15 => Some(Self::Large),
            _ => None,
        }
    }

    /// Convert to the persisted menu code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }
}

/// Lightweight concrete weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum WeightClass {
    /// Above 120 lb/ft³.
    #[default]
    High = 16,
    /// 115-120 lb/ft³.
    Medium = 17,
    /// Below 115 lb/ft³.
    Low = 18,
    /// Super-low weight. Not offered by the settings wizard.
    SuperLow = 19,
}

impl WeightClass {
    /// Lowest menu code.
    pub const MIN_RAW: u8 = 16;
    /// Highest menu code.
    pub const MAX_RAW: u8 = 19;

    /// Create from a persisted menu code.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            16 => Some(Self::High),
            17 => Some(Self::Medium),
            18 => Some(Self::Low),
            19 => Some(Self::SuperLow),
            _ => None,
        }
    }

    /// Convert to the persisted menu code.
    pub fn to_raw(&self) -> u8 {
        *self as u8
    }

    /// Pressure multiplier in percent.
    pub fn scale_percent(&self) -> i32 {
        match self {
            Self::Low => 84,
            Self::SuperLow => 66,
            Self::High | Self::Medium => 100,
        }
    }
}

/// The six operator-selected configuration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Probe power level.
    pub power: PowerLevel,
    /// Concrete density class.
    pub density: Density,
    /// Light-density weight class.
    pub weight: WeightClass,
    /// Standard-density aggregate hardness.
    pub hardness: HardnessClass,
    /// Display units.
    pub units: Units,
    /// Coarse aggregate size.
    pub aggregate: AggregateSize,
}

impl Settings {
    /// Number of persisted bytes.
    pub const SIZE: usize = 6;

    /// Encode in persisted order: power, density, weight, mohs, units, aggregate.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [
            self.power.to_raw(),
            self.density.to_raw(),
            self.weight.to_raw(),
            self.hardness.to_raw(),
            self.units.to_raw(),
            self.aggregate.to_raw(),
        ]
    }

    /// Decode from persisted order, substituting defaults for unknown codes.
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            power: PowerLevel::from_raw(bytes[0]).unwrap_or_default(),
            density: Density::from_raw(bytes[1]).unwrap_or_default(),
            weight: WeightClass::from_raw(bytes[2]).unwrap_or_default(),
            hardness: HardnessClass::from_raw(bytes[3]).unwrap_or_default(),
            units: Units::from_raw(bytes[4]).unwrap_or_default(),
            aggregate: AggregateSize::from_raw(bytes[5]).unwrap_or_default(),
        }
    }
}

/// ADC zero and full-scale readings from the last calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    /// Reading with the probe at the zero gauge.
    pub zero: u8,
    /// Reading with the probe at the full-scale gauge.
    pub full_scale: u8,
}

impl Calibration {
    /// Create a calibration from both readings of one run.
    pub fn new(zero: u8, full_scale: u8) -> Self {
        Self { zero, full_scale }
    }

    /// Reading-to-distance scale factor, `None` when the span is degenerate.
    pub fn scale(&self) -> Option<u32> {
        crate::calibration::scale_factor(self.zero, self.full_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_codes_are_disjoint() {
        assert_eq!(PowerLevel::High.to_raw(), 3);
        assert_eq!(Density::Light.to_raw(), 5);
        assert_eq!(HardnessClass::Moh7.to_raw(), 10);
        assert_eq!(Units::Imperial.to_raw(), 12);
        assert_eq!(AggregateSize::Large.to_raw(), 15);
        assert_eq!(WeightClass::SuperLow.to_raw(), 19);
    }

    #[test]
    fn test_from_raw_rejects_foreign_codes() {
        assert_eq!(PowerLevel::from_raw(4), None);
        assert_eq!(Units::from_raw(0xFF), None);
        assert_eq!(HardnessClass::from_raw(8), Some(HardnessClass::Moh5));
        assert_eq!(HardnessClass::Moh5.mohs(), 5);
    }

    #[test]
    fn test_weight_scale() {
        assert_eq!(WeightClass::High.scale_percent(), 100);
        assert_eq!(WeightClass::Medium.scale_percent(), 100);
        assert_eq!(WeightClass::Low.scale_percent(), 84);
        assert_eq!(WeightClass::SuperLow.scale_percent(), 66);
    }

    #[test]
    fn test_settings_bytes() {
        let settings = Settings {
            power: PowerLevel::Low,
            density: Density::Light,
            weight: WeightClass::Medium,
            hardness: HardnessClass::Moh6,
            units: Units::Metric,
            aggregate: AggregateSize::Small,
        };
        assert_eq!(settings.to_bytes(), [2, 5, 17, 9, 11, 14]);
        assert_eq!(Settings::from_bytes(settings.to_bytes()), settings);
    }

    #[test]
    fn test_settings_blank_eeprom() {
        let settings = Settings::from_bytes([0xFF; 6]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.units, Units::Imperial);
    }
}
