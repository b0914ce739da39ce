//! Stored test browser.

use tracing::{debug, warn};

use super::{Context, Event, Screen, Selector, Session, Step};
use crate::data::TestRecord;
use crate::display::{clock_line, measurement_frame, Annotation, Frame};
use crate::hal::{Key, NonvolatileStore, Row};

/// What the browser is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowsePage {
    /// Test number and time stamp, selectable with Up/Down.
    Select,
    /// One reading (0-based) of the selected test.
    Sample(u8),
    /// The selected test's average reading.
    Average,
}

/// Walks stored tests by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestBrowser {
    selector: Selector,
    record: TestRecord,
    page: BrowsePage,
}

impl TestBrowser {
    /// Open on the first stored test. Returns home when nothing is stored.
    pub fn open<S: NonvolatileStore>(ctx: &mut Context<'_, S>) -> Step {
        let count = ctx.store.count();
        if count == 0 {
            debug!("No stored tests to show");
            return ctx.go_home();
        }
        match ctx.store.read(1) {
            Ok(record) => Step::to(Screen::ShowTests(Self {
                selector: Selector::new(1, 1, count),
                record,
                page: BrowsePage::Select,
            })),
            Err(e) => {
                warn!("Cannot open stored tests: {}", e);
                ctx.go_home()
            }
        }
    }

    /// 1-based number of the selected test.
    pub fn index(&self) -> u8 {
        self.selector.value()
    }

    /// The selected test.
    pub fn record(&self) -> &TestRecord {
        &self.record
    }

    /// Current page.
    pub fn page(&self) -> BrowsePage {
        self.page
    }

    /// Handle one event.
    pub fn handle<S: NonvolatileStore>(mut self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        let key = match event {
            Event::Key(key) => key,
            Event::Tick => return Step::to(Screen::ShowTests(self)),
        };

        match (self.page, key) {
            (BrowsePage::Select, Key::Enter) => self.page = BrowsePage::Sample(0),
            (BrowsePage::Select, key) => {
                if self.selector.apply(key) {
                    match ctx.store.read(self.index()) {
                        Ok(record) => self.record = record,
                        Err(e) => {
                            warn!("Cannot read stored test: {}", e);
                            return ctx.go_home();
                        }
                    }
                }
            }
            (BrowsePage::Sample(n), Key::Enter) if n < 2 => self.page = BrowsePage::Sample(n + 1),
            (BrowsePage::Sample(_), Key::Enter) => self.page = BrowsePage::Average,
            (BrowsePage::Average, Key::Enter) => return ctx.go_home(),
            _ => {}
        }
        Step::to(Screen::ShowTests(self))
    }

    /// Render the current page using the test's own configuration.
    pub fn render(&self) -> Frame {
        let test = Some(self.index());
        let (reading, annotation) = match self.page {
            BrowsePage::Select => {
                let mut frame = Frame::new();
                frame
                    .line_mut(Row::First)
                    .push_str("Test No.")
                    .push_decimal2(self.index());
                frame.set_line(Row::Second, clock_line(&self.record.stamp, false));
                return frame;
            }
            BrowsePage::Sample(n) => (
                self.record.samples[n as usize],
                Annotation::Sample {
                    test,
                    sub_test: n + 1,
                },
            ),
            BrowsePage::Average => (self.record.average(), Annotation::Average { test }),
        };

        let session = Session {
            settings: self.record.settings,
            calibration: self.record.calibration,
        };
        measurement_frame(&session.measure(reading), &session.settings, annotation)
    }
}
