//! Screen content formatting.
//!
//! Screens build a [`Frame`] of two fixed-width [`LineBuffer`]s and hand it
//! to the device loop, which pushes it to the LCD only when it changed.

pub mod format;
pub mod labels;
pub mod line;

pub use format::{
    clock_line, measurement_frame, push_distance, push_pressure, push_settings_code, Annotation,
};
pub use labels::{
    aggregate_label, density_label, hardness_label, power_label, units_label, weight_label,
};
pub use line::{Frame, LineBuffer};
