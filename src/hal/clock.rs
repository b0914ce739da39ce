//! Real-time clock.

use chrono::{Duration, Local, NaiveDateTime};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::data::ClockTime;

/// Battery-backed real-time clock running in 12-hour mode.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Read the current time.
    fn read(&mut self) -> ClockTime;

    /// Set the time. Seconds restart from zero.
    fn write(&mut self, time: &ClockTime);
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn read(&mut self) -> ClockTime {
        (**self).read()
    }

    fn write(&mut self, time: &ClockTime) {
        (**self).write(time)
    }
}

/// Clock derived from the host's local time plus an operator offset.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    offset: Duration,
}

impl SystemClock {
    /// Create a clock that follows local time.
    pub fn new() -> Self {
        Self::default()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local() + self.offset
    }
}

impl Clock for SystemClock {
    fn read(&mut self) -> ClockTime {
        ClockTime::from_naive_datetime(&self.now())
    }

    fn write(&mut self, time: &ClockTime) {
        match time.to_naive_datetime() {
            Some(target) => {
                self.offset = target - Local::now().naive_local();
                debug!("System clock offset set to {}s", self.offset.num_seconds());
            }
            None => warn!("Ignoring impossible clock setting {:?}", time),
        }
    }
}

/// Clock that only changes when set, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<RwLock<ClockTime>>,
}

impl ManualClock {
    /// Create a clock stopped at `time`.
    pub fn new(time: ClockTime) -> Self {
        Self {
            time: Arc::new(RwLock::new(time)),
        }
    }

    /// Current setting.
    pub fn now(&self) -> ClockTime {
        *self.time.read()
    }

    /// Change the setting.
    pub fn set(&self, time: ClockTime) {
        *self.time.write() = time;
    }
}

impl Clock for ManualClock {
    fn read(&mut self) -> ClockTime {
        self.now()
    }

    fn write(&mut self, time: &ClockTime) {
        self.set(*time);
    }
}
