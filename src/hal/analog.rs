//! Probe position ADC.

use parking_lot::RwLock;
use std::sync::Arc;

/// Single-channel ADC connected to the probe position sensor.
#[cfg_attr(test, mockall::automock)]
pub trait Analog {
    /// Take one 8-bit reading. Blocks for the acquisition time.
    fn sample(&mut self) -> u8;
}

impl<T: Analog + ?Sized> Analog for Box<T> {
    fn sample(&mut self) -> u8 {
        (**self).sample()
    }
}

/// A settable reading shared between the device and a test or simulator.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnalog {
    reading: Arc<RwLock<u8>>,
}

impl SimulatedAnalog {
    /// Create an input that reads `reading` until changed.
    pub fn new(reading: u8) -> Self {
        Self {
            reading: Arc::new(RwLock::new(reading)),
        }
    }

    /// Change the reading returned by subsequent samples.
    pub fn set(&self, reading: u8) {
        *self.reading.write() = reading;
    }

    /// Current reading.
    pub fn get(&self) -> u8 {
        *self.reading.read()
    }
}

impl Analog for SimulatedAnalog {
    fn sample(&mut self) -> u8 {
        self.get()
    }
}
