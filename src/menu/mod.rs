//! Menu state machine.
//!
//! Exactly one [`Screen`] is active at a time. Each key press or idle tick
//! is an [`Event`]; [`Screen::handle`] consumes the current screen and
//! returns the next one, possibly with a timed message to show first.
//! Rendering is a separate, side-effect free step.
//!
//! Escape from any screen returns home and reloads the configuration from
//! the store, discarding anything not yet saved.

pub mod browser;
pub mod calibrate;
pub mod clock_editor;
pub mod selector;
pub mod test_run;
pub mod transfer;
pub mod wizard;

use tracing::debug;

use crate::calibration::Measurement;
use crate::data::{Calibration, ClockTime, Density, PowerLevel, Settings};
use crate::display::{
    aggregate_label, clock_line, density_label, hardness_label, measurement_frame, power_label,
    weight_label, Annotation, Frame, LineBuffer,
};
use crate::hal::{Analog, Clock, Key, NonvolatileStore, Row, Uplink};
use crate::storage::RecordStore;

pub use browser::{BrowsePage, TestBrowser};
pub use calibrate::CalibrationRun;
pub use clock_editor::{ClockEditor, ClockField};
pub use selector::Selector;
pub use test_run::{TestPhase, TestRun};
pub use transfer::DownloadStage;
pub use wizard::{SettingsWizard, WizardStage};

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A debounced key press.
    Key(Key),
    /// A loop iteration without a key press.
    Tick,
}

/// The live configuration the screens work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    /// Operator settings.
    pub settings: Settings,
    /// Probe calibration.
    pub calibration: Calibration,
}

impl Session {
    /// Load the persisted configuration.
    pub fn load<S: NonvolatileStore>(store: &mut RecordStore<S>) -> Self {
        let (settings, calibration) = store.load_settings();
        Self {
            settings,
            calibration,
        }
    }

    /// Convert a reading under this configuration.
    pub fn measure(&self, reading: u8) -> Measurement {
        Measurement::convert(reading, &self.settings, &self.calibration)
    }
}

/// Collaborators a screen may use while handling an event.
pub struct Context<'a, S> {
    /// Live configuration.
    pub session: &'a mut Session,
    /// Persistent storage.
    pub store: &'a mut RecordStore<S>,
    /// Probe position input.
    pub analog: &'a mut dyn Analog,
    /// Real-time clock.
    pub clock: &'a mut dyn Clock,
    /// PC serial link.
    pub uplink: &'a mut dyn Uplink,
}

impl<S: NonvolatileStore> Context<'_, S> {
    /// Return to the home screen, reloading the configuration.
    pub fn go_home(&mut self) -> Step {
        *self.session = Session::load(self.store);
        Step::to(Screen::Home {
            time: self.clock.read(),
        })
    }
}

/// Outcome of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The screen that is now active.
    pub screen: Screen,
    /// Message to show for the dwell time before the new screen.
    pub flash: Option<Frame>,
}

impl Step {
    /// Move to `screen` without a message.
    pub fn to(screen: Screen) -> Self {
        Self {
            screen,
            flash: None,
        }
    }

    /// Show `frame` before the new screen.
    pub fn with_flash(mut self, frame: Frame) -> Self {
        self.flash = Some(frame);
        self
    }
}

/// Main menu entries, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MainItem {
    /// Live distance and pressure readout.
    Measure = 1,
    /// Take and store a three-reading test.
    RunTest = 2,
    /// Browse stored tests.
    ShowTests = 3,
    /// Send stored tests to a PC.
    DownloadTests = 4,
    /// Setup submenu.
    EnterSetup = 5,
}

impl MainItem {
    /// Create from a selector value.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Measure),
            2 => Some(Self::RunTest),
            3 => Some(Self::ShowTests),
            4 => Some(Self::DownloadTests),
            5 => Some(Self::EnterSetup),
            _ => None,
        }
    }

    /// Menu text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Measure => "Measure",
            Self::RunTest => "Run Test",
            Self::ShowTests => "Show Tests",
            Self::DownloadTests => "Download Tests",
            Self::EnterSetup => "Enter Setup",
        }
    }

    fn selector() -> Selector {
        Selector::new(Self::Measure as u8, Self::Measure as u8, Self::EnterSetup as u8)
    }
}

/// Setup submenu entries, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SetupItem {
    /// Show the current settings.
    ShowSettings = 1,
    /// Settings wizard.
    SetSettings = 2,
    /// Clock editor.
    SetClock = 3,
    /// Zero/full-scale calibration.
    Calibrate = 4,
}

impl SetupItem {
    /// Create from a selector value.
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::ShowSettings),
            2 => Some(Self::SetSettings),
            3 => Some(Self::SetClock),
            4 => Some(Self::Calibrate),
            _ => None,
        }
    }

    /// Menu text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShowSettings => "Show Settings",
            Self::SetSettings => "Set Settings",
            Self::SetClock => "Set Clock",
            Self::Calibrate => "Calibrate",
        }
    }

    fn selector() -> Selector {
        Selector::new(Self::ShowSettings as u8, Self::ShowSettings as u8, Self::Calibrate as u8)
    }
}

/// The active screen and the state it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Clock and stored test count.
    Home {
        /// Last clock reading.
        time: ClockTime,
    },
    /// Main menu with the highlighted entry.
    MainMenu(Selector),
    /// Live readout.
    Measure {
        /// Latest reading.
        reading: u8,
    },
    /// Test in progress.
    RunTest(TestRun),
    /// Stored test browser.
    ShowTests(TestBrowser),
    /// Test download.
    Download(DownloadStage),
    /// Setup submenu with the highlighted entry.
    Setup(Selector),
    /// Read-only settings summary.
    ShowSettings,
    /// Settings wizard.
    SetSettings(SettingsWizard),
    /// Clock editor.
    SetClock(ClockEditor),
    /// Calibration run.
    Calibrate(CalibrationRun),
}

impl Default for Screen {
    fn default() -> Self {
        Self::Home {
            time: ClockTime::default(),
        }
    }
}

impl Screen {
    /// Check if this is the home screen.
    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home { .. })
    }

    /// Check if this screen shows a live reading that follows the probe.
    pub fn is_live(&self) -> bool {
        match self {
            Self::Measure { .. } => true,
            Self::RunTest(run) => !matches!(run.phase(), TestPhase::Complete { .. }),
            _ => false,
        }
    }

    /// Handle one event and return the next screen.
    pub fn handle<S: NonvolatileStore>(self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        if event == Event::Key(Key::Escape) {
            debug!("Escape pressed, returning home");
            return ctx.go_home();
        }

        match self {
            Self::Home { time } => match event {
                Event::Tick => Step::to(Self::Home {
                    time: ctx.clock.read(),
                }),
                Event::Key(Key::Enter) => open_main(MainItem::Measure, ctx),
                Event::Key(key) => {
                    let mut selector = MainItem::selector();
                    if selector.apply(key) {
                        Step::to(Self::MainMenu(selector))
                    } else {
                        Step::to(Self::Home { time })
                    }
                }
            },
            Self::MainMenu(mut selector) => match event {
                Event::Key(Key::Enter) => match MainItem::from_raw(selector.value()) {
                    Some(item) => open_main(item, ctx),
                    None => ctx.go_home(),
                },
                Event::Key(key) => {
                    selector.apply(key);
                    Step::to(Self::MainMenu(selector))
                }
                Event::Tick => Step::to(Self::MainMenu(selector)),
            },
            Self::Measure { reading } => match event {
                Event::Tick => Step::to(Self::Measure {
                    reading: ctx.analog.sample(),
                }),
                Event::Key(_) => Step::to(Self::Measure { reading }),
            },
            Self::RunTest(run) => run.handle(event, ctx),
            Self::ShowTests(browser) => browser.handle(event, ctx),
            Self::Download(stage) => stage.handle(event, ctx),
            Self::Setup(mut selector) => match event {
                Event::Key(Key::Enter) => match SetupItem::from_raw(selector.value()) {
                    Some(item) => open_setup(item, ctx),
                    None => ctx.go_home(),
                },
                Event::Key(key) => {
                    selector.apply(key);
                    Step::to(Self::Setup(selector))
                }
                Event::Tick => Step::to(Self::Setup(selector)),
            },
            Self::ShowSettings => match event {
                Event::Key(Key::Enter) => ctx.go_home(),
                _ => Step::to(Self::ShowSettings),
            },
            Self::SetSettings(wizard) => wizard.handle(event, ctx),
            Self::SetClock(editor) => editor.handle(event, ctx),
            Self::Calibrate(run) => run.handle(event, ctx),
        }
    }

    /// Render the screen.
    ///
    /// `stored` is the number of stored tests, shown on the home screen.
    pub fn render(&self, session: &Session, stored: u8) -> Frame {
        match self {
            Self::Home { time } => {
                let mut frame = Frame::new();
                frame.set_line(Row::First, clock_line(time, false));
                frame
                    .line_mut(Row::Second)
                    .push_str("Stored Tests:")
                    .push_decimal2(stored);
                frame
            }
            Self::MainMenu(selector) => Frame::text(
                MainItem::from_raw(selector.value()).map_or("", |item| item.label()),
                "",
            ),
            Self::Measure { reading } => measurement_frame(
                &session.measure(*reading),
                &session.settings,
                Annotation::None,
            ),
            Self::RunTest(run) => run.render(session),
            Self::ShowTests(browser) => browser.render(),
            Self::Download(stage) => stage.render(),
            Self::Setup(selector) => Frame::text(
                SetupItem::from_raw(selector.value()).map_or("", |item| item.label()),
                "",
            ),
            Self::ShowSettings => settings_frame(&session.settings),
            Self::SetSettings(wizard) => wizard.render(),
            Self::SetClock(editor) => editor.render(),
            Self::Calibrate(run) => run.render(),
        }
    }
}

fn open_main<S: NonvolatileStore>(item: MainItem, ctx: &mut Context<'_, S>) -> Step {
    debug!("Opening {:?}", item);
    match item {
        MainItem::Measure => Step::to(Screen::Measure {
            reading: ctx.analog.sample(),
        }),
        MainItem::RunTest => TestRun::start(ctx),
        MainItem::ShowTests => TestBrowser::open(ctx),
        MainItem::DownloadTests => DownloadStage::open(ctx),
        MainItem::EnterSetup => Step::to(Screen::Setup(SetupItem::selector())),
    }
}

fn open_setup<S: NonvolatileStore>(item: SetupItem, ctx: &mut Context<'_, S>) -> Step {
    debug!("Opening {:?}", item);
    match item {
        SetupItem::ShowSettings => Step::to(Screen::ShowSettings),
        SetupItem::SetSettings => Step::to(Screen::SetSettings(SettingsWizard::new(
            ctx.session.settings,
        ))),
        SetupItem::SetClock => Step::to(Screen::SetClock(ClockEditor::new(ctx.clock.read()))),
        SetupItem::Calibrate => Step::to(Screen::Calibrate(CalibrationRun::default())),
    }
}

/// Settings summary: power and aggregate on line 1, density and
/// Mohs/weight on line 2. High power has no density choice.
fn settings_frame(settings: &Settings) -> Frame {
    let mut frame = Frame::new();
    frame
        .line_mut(Row::First)
        .push_str(power_label(settings.power))
        .move_to(11)
        .push_str(aggregate_label(settings.aggregate, settings.units));

    if settings.power != PowerLevel::High {
        let detail = match settings.density {
            Density::Standard => hardness_label(settings.hardness),
            Density::Light => weight_label(settings.weight, settings.units),
        };
        let mut line = LineBuffer::from_text(density_label(settings.density));
        line.move_to(10).push_str(detail);
        frame.set_line(Row::Second, line);
    }
    frame
}
