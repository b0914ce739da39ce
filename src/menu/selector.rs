//! Up/down value selector.

use crate::hal::Key;

/// A value chosen with the Up and Down keys from `min..=max`.
///
/// Both ends wrap, so the operator can reach any value from either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    value: u8,
    min: u8,
    max: u8,
}

impl Selector {
    /// Create a selector starting at `value`.
    ///
    /// A starting value outside the range is shown as-is until the first
    /// key press: Up then moves it to `min` and Down to `max`.
    pub fn new(value: u8, min: u8, max: u8) -> Self {
        debug_assert!(min <= max);
        Self { value, min, max }
    }

    /// Currently highlighted value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Lowest selectable value.
    pub fn min(&self) -> u8 {
        self.min
    }

    /// Highest selectable value.
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Step up, wrapping from `max` to `min`.
    pub fn up(&mut self) {
        self.value = if self.value >= self.max || self.value < self.min {
            self.min
        } else {
            self.value + 1
        };
    }

    /// Step down, wrapping from `min` to `max`.
    pub fn down(&mut self) {
        self.value = if self.value <= self.min || self.value > self.max {
            self.max
        } else {
            self.value - 1
        };
    }

    /// Apply an Up or Down key. Returns `false` for any other key.
    pub fn apply(&mut self, key: Key) -> bool {
        match key {
            Key::Up => self.up(),
            Key::Down => self.down(),
            _ => return false,
        }
        true
    }
}
