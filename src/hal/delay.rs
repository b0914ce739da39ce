//! Blocking pauses.

use std::time::Duration;

/// Blocking delay provider.
///
/// The firmware has no scheduler; every pause blocks the single loop.
#[cfg_attr(test, mockall::automock)]
pub trait Delay {
    /// Block for `duration`.
    fn pause(&mut self, duration: Duration);
}

impl<T: Delay + ?Sized> Delay for Box<T> {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

/// Delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Delay that returns immediately, for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn pause(&mut self, _duration: Duration) {}
}
