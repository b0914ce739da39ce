//! Device struct and main loop.
//!
//! Owns the hardware collaborators and the active screen, and runs the
//! single-threaded poll/dispatch/draw loop of the instrument.

use std::mem;
use std::time::Duration;
use tracing::{debug, info};

use crate::display::Frame;
use crate::hal::{Analog, Clock, Delay, Display, Key, Keypad, NonvolatileStore, Row, Uplink};
use crate::menu::{Context, Event, Screen, Session};
use crate::storage::RecordStore;

/// Fixed pauses of the device loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long a message such as `Memory Full` stays up.
    pub message_dwell: Duration,
    /// Settling time before the first access at power-up.
    pub power_up: Duration,
}

impl Timing {
    /// Default message dwell (2 seconds).
    pub const DEFAULT_MESSAGE_DWELL: Duration = Duration::from_millis(2000);
    /// Default power-up delay (25 milliseconds).
    pub const DEFAULT_POWER_UP: Duration = Duration::from_millis(25);
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            message_dwell: Self::DEFAULT_MESSAGE_DWELL,
            power_up: Self::DEFAULT_POWER_UP,
        }
    }
}

/// The instrument's hardware.
pub struct Peripherals {
    /// Debounced keypad.
    pub keypad: Box<dyn Keypad>,
    /// Two-line character LCD.
    pub display: Box<dyn Display>,
    /// Serial EEPROM.
    pub store: Box<dyn NonvolatileStore>,
    /// Real-time clock.
    pub clock: Box<dyn Clock>,
    /// Probe position ADC.
    pub analog: Box<dyn Analog>,
    /// PC serial link.
    pub uplink: Box<dyn Uplink>,
    /// Blocking delay.
    pub delay: Box<dyn Delay>,
}

/// A Windsor Probe hardness tester.
pub struct WindsorProbe {
    keypad: Box<dyn Keypad>,
    display: Box<dyn Display>,
    clock: Box<dyn Clock>,
    analog: Box<dyn Analog>,
    uplink: Box<dyn Uplink>,
    delay: Box<dyn Delay>,
    store: RecordStore<Box<dyn NonvolatileStore>>,
    session: Session,
    screen: Screen,
    /// Last frame pushed to the display.
    shown: Option<Frame>,
    timing: Timing,
}

impl WindsorProbe {
    /// Create a device over its peripherals.
    ///
    /// Opens the record store. Nothing is drawn until [`boot`](Self::boot).
    pub fn new(peripherals: Peripherals, timing: Timing) -> Self {
        let Peripherals {
            keypad,
            display,
            store,
            clock,
            analog,
            uplink,
            delay,
        } = peripherals;

        Self {
            keypad,
            display,
            clock,
            analog,
            uplink,
            delay,
            store: RecordStore::new(store),
            session: Session::default(),
            screen: Screen::default(),
            shown: None,
            timing,
        }
    }

    /// Power-up: settle, load the configuration and show the home screen.
    pub fn boot(&mut self) {
        self.delay.pause(self.timing.power_up);
        self.session = Session::load(&mut self.store);
        self.screen = Screen::Home {
            time: self.clock.read(),
        };
        self.shown = None;
        info!("Booted with {} stored tests", self.store.count());
        self.draw();
    }

    /// Run one loop iteration.
    ///
    /// Returns the event that was dispatched: the key pressed, or
    /// [`Event::Tick`] when none was.
    pub fn poll(&mut self) -> Event {
        let key = self.keypad.poll();
        let event = if key.is_pressed() {
            Event::Key(key)
        } else {
            Event::Tick
        };
        self.dispatch(event);
        event
    }

    /// Dispatch a key press as if it came from the keypad.
    pub fn press(&mut self, key: Key) {
        self.dispatch(Event::Key(key));
    }

    /// Boot, then poll forever.
    pub fn run(&mut self) -> ! {
        self.boot();
        loop {
            self.poll();
        }
    }

    fn dispatch(&mut self, event: Event) {
        let before = mem::discriminant(&self.screen);
        let screen = mem::take(&mut self.screen);
        let mut ctx = Context {
            session: &mut self.session,
            store: &mut self.store,
            analog: &mut *self.analog,
            clock: &mut *self.clock,
            uplink: &mut *self.uplink,
        };
        let step = screen.handle(event, &mut ctx);

        if let Some(flash) = step.flash {
            debug!("Showing message {:?}", flash.line(Row::Second).trimmed());
            self.show(flash);
            self.delay.pause(self.timing.message_dwell);
        }
        if mem::discriminant(&step.screen) != before {
            debug!("Screen changed to {:?}", step.screen);
        }
        self.screen = step.screen;
        self.draw();
    }

    fn draw(&mut self) {
        let frame = self.screen.render(&self.session, self.store.count());
        if self.shown != Some(frame) {
            self.show(frame);
        }
    }

    fn show(&mut self, frame: Frame) {
        frame.flush(&mut *self.display);
        self.shown = Some(frame);
    }

    /// The active screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The live configuration.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Number of stored tests.
    pub fn stored_count(&self) -> u8 {
        self.store.count()
    }

    /// Borrow the record store.
    pub fn store(&mut self) -> &mut RecordStore<Box<dyn NonvolatileStore>> {
        &mut self.store
    }

    /// Runtime timing.
    pub fn timing(&self) -> Timing {
        self.timing
    }
}

impl std::fmt::Debug for WindsorProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindsorProbe")
            .field("screen", &self.screen)
            .field("session", &self.session)
            .field("stored_count", &self.store.count())
            .finish()
    }
}
