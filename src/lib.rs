//! # windsor-probe
//!
//! Firmware core for the Windsor Probe, a handheld tester that estimates
//! the compressive strength of concrete from how far a driven probe
//! penetrates it.
//!
//! The instrument reads the exposed probe length through an ADC, converts
//! it to a distance and then to a pressure using calibration tables picked
//! by the operator's settings, shows the result on a two-line LCD, and
//! stores up to 99 three-reading tests in serial EEPROM. Everything is
//! driven from a four-key menu.
//!
//! ## Features
//!
//! - **Measurement**: live distance and pressure readout in MPa or PSI
//! - **Tests**: three-reading tests with a consistency check and repeat protocol
//! - **Storage**: fixed 16-byte test records and a persisted configuration block
//! - **Setup**: settings wizard, clock editor and zero/full-scale calibration
//! - **Download**: test transfer to a PC over a serial link, with CSV export
//!
//! ## Quick Start
//!
//! The hardware is reached only through the traits in [`hal`]. The in-memory
//! implementations are enough to run the firmware on a host:
//!
//! ```rust
//! use windsor_probe::hal::{
//!     CaptureUplink, Key, MemoryEeprom, NoDelay, Row, ScriptedKeypad, SharedDisplay,
//!     SimulatedAnalog, SystemClock,
//! };
//! use windsor_probe::{Peripherals, Timing, WindsorProbe};
//!
//! let display = SharedDisplay::new();
//! let mut device = WindsorProbe::new(
//!     Peripherals {
//!         keypad: Box::new(ScriptedKeypad::new()),
//!         display: Box::new(display.clone()),
//!         store: Box::new(MemoryEeprom::new()),
//!         clock: Box::new(SystemClock::new()),
//!         analog: Box::new(SimulatedAnalog::new(60)),
//!         uplink: Box::new(CaptureUplink::new()),
//!         delay: Box::new(NoDelay),
//!     },
//!     Timing::default(),
//! );
//!
//! device.boot();
//! assert_eq!(display.text(Row::Second), "Stored Tests:00");
//!
//! device.press(Key::Enter);
//! assert!(display.text(Row::First).starts_with("in:"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod calibration;
pub mod data;
pub mod display;
pub mod error;
pub mod hal;
pub mod menu;
pub mod probe;
pub mod protocol;
pub mod storage;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};
pub use probe::{Peripherals, Timing, WindsorProbe};
pub use storage::{RecordStore, MAX_RECORDS};
pub use utils::{deci_mpa_to_psi, hundredths_mm_to_inch_ticks};

// Re-export commonly used types from submodules
pub use calibration::{Measurement, Repeat};
pub use data::{
    AggregateSize, Calibration, ClockTime, Density, HardnessClass, PowerLevel, Samples, Settings,
    TestRecord, Units, WeightClass,
};
pub use menu::{Event, Screen, Session};
