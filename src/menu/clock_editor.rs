//! Clock editor.

use tracing::debug;

use super::{Context, Event, Screen, Selector, SetupItem, Step};
use crate::data::ClockTime;
use crate::display::{clock_line, Frame};
use crate::hal::{Key, NonvolatileStore, Row};

/// Editable clock field, in editing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockField {
    /// Month (1-12).
    Month,
    /// Day of month (1-31).
    Day,
    /// Two-digit year.
    Year,
    /// Hour (1-12).
    Hour,
    /// Minute.
    Minute,
    /// AM/PM.
    Meridiem,
}

impl ClockField {
    /// Column of the field's last character on the clock line.
    pub fn column(&self) -> u8 {
        match self {
            Self::Month => 2,
            Self::Day => 5,
            Self::Year => 8,
            Self::Hour => 11,
            Self::Minute => 14,
            Self::Meridiem => 15,
        }
    }

    /// Selectable range. The meridiem is 1 for AM, 2 for PM.
    pub fn range(&self) -> (u8, u8) {
        match self {
            Self::Month => (1, 12),
            Self::Day => (1, 31),
            Self::Year => (0, 99),
            Self::Hour => (1, 12),
            Self::Minute => (0, 59),
            Self::Meridiem => (1, 2),
        }
    }

    /// The field after this one.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Month => Some(Self::Day),
            Self::Day => Some(Self::Year),
            Self::Year => Some(Self::Hour),
            Self::Hour => Some(Self::Minute),
            Self::Minute => Some(Self::Meridiem),
            Self::Meridiem => None,
        }
    }
}

/// Field-by-field clock editor.
///
/// Every change is written to the clock straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockEditor {
    field: ClockField,
    time: ClockTime,
}

impl ClockEditor {
    /// Start editing the month of `time`.
    pub fn new(time: ClockTime) -> Self {
        Self {
            field: ClockField::Month,
            time,
        }
    }

    /// Field under the cursor.
    pub fn field(&self) -> ClockField {
        self.field
    }

    /// Time as edited so far.
    pub fn time(&self) -> ClockTime {
        self.time
    }

    fn value(&self) -> u8 {
        match self.field {
            ClockField::Month => self.time.month,
            ClockField::Day => self.time.day,
            ClockField::Year => self.time.year,
            ClockField::Hour => self.time.hour,
            ClockField::Minute => self.time.minute,
            ClockField::Meridiem => 1 + self.time.is_pm as u8,
        }
    }

    fn set_value(&mut self, value: u8) {
        match self.field {
            ClockField::Month => self.time.month = value,
            ClockField::Day => self.time.day = value,
            ClockField::Year => self.time.year = value,
            ClockField::Hour => self.time.hour = value,
            ClockField::Minute => self.time.minute = value,
            ClockField::Meridiem => self.time.is_pm = value == 2,
        }
    }

    /// Handle one event.
    pub fn handle<S: NonvolatileStore>(mut self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        match event {
            Event::Key(Key::Enter) => match self.field.next() {
                Some(field) => {
                    self.field = field;
                    Step::to(Screen::SetClock(self))
                }
                None => ctx.go_home(),
            },
            Event::Key(key) => {
                let (min, max) = self.field.range();
                let mut selector = Selector::new(self.value(), min, max);
                if selector.apply(key) {
                    self.set_value(selector.value());
                    ctx.clock.write(&self.time);
                    debug!("Clock set to {:?}", self.time);
                }
                Step::to(Screen::SetClock(self))
            }
            Event::Tick => Step::to(Screen::SetClock(self)),
        }
    }

    /// Render the title, the clock line and the field cursor.
    pub fn render(&self) -> Frame {
        let mut frame = Frame::text(SetupItem::SetClock.label(), "");
        frame.set_line(Row::Second, clock_line(&self.time, true));
        frame.cursor = Some((Row::Second, self.field.column()));
        frame
    }
}
