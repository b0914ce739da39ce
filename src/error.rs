//! Error types for the windsor-probe crate.

use thiserror::Error;

use crate::calibration::Repeat;

/// The main error type for this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The test record store already holds its maximum number of records.
    #[error("Memory full: {capacity} tests already stored")]
    CapacityExceeded {
        /// The maximum number of records the store can hold.
        capacity: u8,
    },

    /// The three sub-measurements of a test disagree by more than the
    /// aggregate tolerance.
    #[error("Sub-measurements out of tolerance ({failures} pairs), repeat {repeat:?}")]
    ToleranceExceeded {
        /// Which part of the test must be taken again.
        repeat: Repeat,
        /// Number of sample pairs that were out of tolerance.
        failures: u8,
    },

    /// A record index outside `1..=count` was requested.
    #[error("Test {index} out of range (stored: {count})")]
    OutOfRange {
        /// The requested 1-based index.
        index: u8,
        /// The number of records currently stored.
        count: u8,
    },

    /// Invalid data was received, e.g. a truncated download stream.
    #[error("Invalid data received: {context}")]
    InvalidData {
        /// Description of what was invalid about the data.
        context: String,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The invalid value that was provided.
        value: String,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
