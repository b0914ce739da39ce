//! Three-reading test.
//!
//! The operator takes three readings with Enter. They are then checked for
//! consistency; a failure names the reading (or the whole test) to take
//! again. A consistent test shows its average, and the next Enter stores
//! it with the current time.

use tracing::{debug, info, warn};

use super::{Context, Event, Screen, Session, Step};
use crate::calibration::{check_samples, tolerance, Repeat};
use crate::data::{Samples, TestRecord};
use crate::display::{measurement_frame, Annotation, Frame};
use crate::error::Error;
use crate::hal::{Key, NonvolatileStore};

/// Where a test run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    /// Taking reading `n` (0-based) of the first pass.
    Collecting(u8),
    /// Retaking reading `n` (0-based) after a failed check.
    Repeating(u8),
    /// The failed check named no single reading; Enter checks again.
    Unresolved,
    /// All three readings agree.
    Complete {
        /// Average reading.
        average: u8,
    },
}

/// A test in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestRun {
    phase: TestPhase,
    samples: Samples,
    reading: u8,
    retrying: bool,
}

fn memory_full() -> Frame {
    Frame::text("Run Test", "Memory Full")
}

impl TestRun {
    /// Start a test, unless the store is full.
    pub fn start<S: NonvolatileStore>(ctx: &mut Context<'_, S>) -> Step {
        if ctx.store.is_full() {
            warn!("Test store full, not starting a test");
            return ctx.go_home().with_flash(memory_full());
        }
        let run = Self {
            phase: TestPhase::Collecting(0),
            samples: [0; 3],
            reading: ctx.analog.sample(),
            retrying: false,
        };
        Step::to(Screen::RunTest(run))
    }

    /// Current phase.
    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    /// Readings taken so far.
    pub fn samples(&self) -> Samples {
        self.samples
    }

    /// Handle one event.
    pub fn handle<S: NonvolatileStore>(mut self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        match event {
            Event::Tick => {
                if !matches!(self.phase, TestPhase::Complete { .. }) {
                    self.reading = ctx.analog.sample();
                }
                Step::to(Screen::RunTest(self))
            }
            Event::Key(Key::Enter) => self.enter(ctx),
            Event::Key(_) => Step::to(Screen::RunTest(self)),
        }
    }

    fn enter<S: NonvolatileStore>(mut self, ctx: &mut Context<'_, S>) -> Step {
        match self.phase {
            TestPhase::Collecting(n) => {
                self.samples[n as usize] = self.reading;
                if n < 2 {
                    self.phase = TestPhase::Collecting(n + 1);
                    self.reading = ctx.analog.sample();
                    return Step::to(Screen::RunTest(self));
                }
                self.check(ctx)
            }
            TestPhase::Repeating(n) => {
                self.samples[n as usize] = self.reading;
                self.check(ctx)
            }
            TestPhase::Unresolved => self.check(ctx),
            TestPhase::Complete { .. } => {
                let record = TestRecord::new(
                    ctx.clock.read(),
                    ctx.session.settings,
                    ctx.session.calibration,
                    self.samples,
                );
                match ctx.store.append(&record) {
                    Ok(_) => ctx.go_home(),
                    Err(e) => {
                        warn!("Test not stored: {}", e);
                        ctx.go_home().with_flash(memory_full())
                    }
                }
            }
        }
    }

    fn check<S: NonvolatileStore>(mut self, ctx: &mut Context<'_, S>) -> Step {
        let session = &ctx.session;
        let tolerance = tolerance(
            session.settings.aggregate,
            session.calibration.scale().unwrap_or(0),
        );

        let second = match check_samples(&self.samples, tolerance, self.retrying) {
            Ok(average) => {
                info!("Test complete, average reading {}", average);
                self.phase = TestPhase::Complete { average };
                self.retrying = false;
                return Step::to(Screen::RunTest(self));
            }
            Err(Error::ToleranceExceeded {
                repeat: Repeat::SubTest(n),
                ..
            }) => {
                self.phase = TestPhase::Repeating(n - 1);
                self.retrying = true;
                format!("Test No:{}", n)
            }
            Err(Error::ToleranceExceeded {
                repeat: Repeat::Unresolved,
                ..
            }) => {
                self.phase = TestPhase::Unresolved;
                self.retrying = true;
                "Error - Repeat".to_string()
            }
            Err(_) => {
                self.phase = TestPhase::Collecting(0);
                self.samples = [0; 3];
                self.retrying = false;
                "Entire Test".to_string()
            }
        };

        debug!("Test check failed, now {:?}", self.phase);
        self.reading = ctx.analog.sample();
        Step::to(Screen::RunTest(self)).with_flash(Frame::text("Error - Repeat", &second))
    }

    /// Render the live reading, or the average once complete.
    pub fn render(&self, session: &Session) -> Frame {
        let (reading, annotation) = match self.phase {
            TestPhase::Collecting(n) | TestPhase::Repeating(n) => (
                self.reading,
                Annotation::Sample {
                    test: None,
                    sub_test: n + 1,
                },
            ),
            TestPhase::Unresolved => (
                self.reading,
                Annotation::Sample {
                    test: None,
                    sub_test: 4,
                },
            ),
            TestPhase::Complete { average } => (average, Annotation::Average { test: None }),
        };
        measurement_frame(&session.measure(reading), &session.settings, annotation)
    }
}
