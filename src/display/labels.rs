//! Short labels for configuration values.
//!
//! Aggregate sizes and weight classes read differently in metric and
//! imperial units, so their labels take the units in effect.

use crate::data::{AggregateSize, Density, HardnessClass, PowerLevel, Units, WeightClass};

/// Power level label.
pub fn power_label(power: PowerLevel) -> &'static str {
    match power {
        PowerLevel::Standard => "Std Power",
        PowerLevel::Low => "Low Power",
        PowerLevel::High => "High Perf",
    }
}

/// Density label.
pub fn density_label(density: Density) -> &'static str {
    match density {
        Density::Standard => "Std Wght ",
        Density::Light => "Lgt Wght ",
    }
}

/// Mohs hardness label.
pub fn hardness_label(hardness: HardnessClass) -> &'static str {
    match hardness {
        HardnessClass::Moh3 => "MOH#3 ",
        HardnessClass::Moh4 => "MOH#4 ",
        HardnessClass::Moh5 => "MOH#5 ",
        HardnessClass::Moh6 => "MOH#6 ",
        HardnessClass::Moh7 => "MOH#7 ",
    }
}

/// Units label.
pub fn units_label(units: Units) -> &'static str {
    match units {
        Units::Metric => "MPa",
        Units::Imperial => "PSI",
    }
}

/// Aggregate size label.
pub fn aggregate_label(aggregate: AggregateSize, units: Units) -> &'static str {
    match (aggregate, units) {
        (AggregateSize::Medium, _) => "Mrtr-M",
        (AggregateSize::Small, Units::Metric) => "25mm-S",
        (AggregateSize::Large, Units::Metric) => "50mm-L",
        (AggregateSize::Small, Units::Imperial) => "1in.-S",
        (AggregateSize::Large, Units::Imperial) => "2in.-L",
    }
}

/// Weight class label: relative density in metric, lb/ft³ in imperial.
pub fn weight_label(weight: WeightClass, units: Units) -> &'static str {
    match (weight, units) {
        (WeightClass::High, Units::Metric) => ">.83-h ",
        (WeightClass::Medium, Units::Metric) => ".83-79m",
        (WeightClass::Low, Units::Metric) => "<.79-l ",
        (WeightClass::High, Units::Imperial) => ">120-h ",
        (WeightClass::Medium, Units::Imperial) => "115-20m",
        (WeightClass::Low, Units::Imperial) => "<115-l ",
        (WeightClass::SuperLow, _) => "SupLow ",
    }
}
