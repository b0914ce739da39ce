//! Four-key keypad.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use super::delay::Delay;

/// A debounced key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Key {
    /// No new key press.
    #[default]
    None,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Enter / confirm.
    Enter,
    /// Escape / back to the main menu.
    Escape,
}

impl Key {
    /// Create from a raw matrix scan code.
    ///
    /// Codes: Down = 2, Enter = 3, Up = 12, Escape = 13, 0 = released.
    pub fn from_scan_code(code: u8) -> Self {
        match code {
            2 => Self::Down,
            3 => Self::Enter,
            12 => Self::Up,
            13 => Self::Escape,
            _ => Self::None,
        }
    }

    /// Convert to the raw matrix scan code.
    pub fn scan_code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Down => 2,
            Self::Enter => 3,
            Self::Up => 12,
            Self::Escape => 13,
        }
    }

    /// Check if this is a real key press.
    pub fn is_pressed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Source of debounced key presses.
#[cfg_attr(test, mockall::automock)]
pub trait Keypad {
    /// Return the newly pressed key, or [`Key::None`] if nothing changed.
    fn poll(&mut self) -> Key;
}

impl<T: Keypad + ?Sized> Keypad for Box<T> {
    fn poll(&mut self) -> Key {
        (**self).poll()
    }
}

/// Raw keypad matrix scanner.
#[cfg_attr(test, mockall::automock)]
pub trait KeyScanner {
    /// Scan the matrix once and return the scan code of the held key, or 0.
    fn scan(&mut self) -> u8;
}

/// Edge-triggered debouncing over a raw scanner.
///
/// A new code is accepted only if it is still held after the debounce
/// pause. Holding a key reports it once; releasing re-arms it.
pub struct Debouncer<S, D> {
    scanner: S,
    delay: D,
    settle: Duration,
    held: u8,
}

impl<S: KeyScanner, D: Delay> Debouncer<S, D> {
    /// Default debounce pause.
    pub const DEFAULT_SETTLE: Duration = Duration::from_millis(50);

    /// Create a debouncer with the default pause.
    pub fn new(scanner: S, delay: D) -> Self {
        Self::with_settle(scanner, delay, Self::DEFAULT_SETTLE)
    }

    /// Create a debouncer with a custom pause.
    pub fn with_settle(scanner: S, delay: D, settle: Duration) -> Self {
        Self {
            scanner,
            delay,
            settle,
            held: 0,
        }
    }
}

impl<S: KeyScanner, D: Delay> Keypad for Debouncer<S, D> {
    fn poll(&mut self) -> Key {
        let code = self.scanner.scan();
        if code == 0 {
            self.held = 0;
            return Key::None;
        }
        if code == self.held {
            return Key::None;
        }

        self.delay.pause(self.settle);
        if self.scanner.scan() == code {
            self.held = code;
            let key = Key::from_scan_code(code);
            trace!("Key pressed: {:?}", key);
            key
        } else {
            self.held = 0;
            Key::None
        }
    }
}

/// Keypad fed from a queue of keys, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeypad {
    queue: Arc<Mutex<VecDeque<Key>>>,
}

impl ScriptedKeypad {
    /// Create an empty keypad.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key press.
    pub fn press(&self, key: Key) {
        self.queue.lock().push_back(key);
    }

    /// Queue several key presses in order.
    pub fn press_all(&self, keys: &[Key]) {
        self.queue.lock().extend(keys.iter().copied());
    }

    /// Number of queued presses.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

impl Keypad for ScriptedKeypad {
    fn poll(&mut self) -> Key {
        self.queue.lock().pop_front().unwrap_or_default()
    }
}
