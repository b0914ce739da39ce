//! Data structures for probe data.
//!
//! This module contains the core data types: the operator configuration,
//! calibration snapshot, real-time clock reading and stored test record.

pub mod clock;
pub mod record;
pub mod settings;

pub use clock::ClockTime;
pub use record::{Samples, TestRecord};
pub use settings::{
    AggregateSize, Calibration, Density, HardnessClass, PowerLevel, Settings, Units, WeightClass,
};
