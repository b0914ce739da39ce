//! Hardware capability interfaces.
//!
//! The firmware core talks to the instrument only through these traits.
//! Board support code implements them over the real keypad matrix, LCD,
//! I2C EEPROM and RTC, ADC and serial port. The in-memory implementations
//! here are shareable handles for tests and the host simulator.

pub mod analog;
pub mod clock;
pub mod delay;
pub mod display;
pub mod eeprom;
pub mod keypad;
pub mod uplink;

pub use analog::{Analog, SimulatedAnalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use delay::{Delay, NoDelay, StdDelay};
pub use display::{Display, Row, SharedDisplay, LINE_WIDTH};
pub use eeprom::{MemoryEeprom, NonvolatileStore, EEPROM_SIZE};
pub use keypad::{Debouncer, Key, KeyScanner, Keypad, ScriptedKeypad};
pub use uplink::{CaptureUplink, Uplink, WriterUplink};
