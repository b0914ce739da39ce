//! Zero/full-scale calibration run.

use tracing::info;

use super::{Context, Event, Screen, SetupItem, Step};
use crate::data::Calibration;
use crate::display::Frame;
use crate::hal::{Key, NonvolatileStore};

/// Calibration progress.
///
/// Nothing is stored until both readings are taken, so an abandoned run
/// leaves the previous calibration intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationRun {
    /// Asking whether to calibrate.
    #[default]
    Confirm,
    /// Waiting for the probe at its zero position.
    Zero,
    /// Waiting for the probe at full extension.
    FullScale {
        /// Reading taken at zero.
        zero: u8,
    },
}

impl CalibrationRun {
    /// Handle one event.
    pub fn handle<S: NonvolatileStore>(self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        if event != Event::Key(Key::Enter) {
            return Step::to(Screen::Calibrate(self));
        }

        let next = match self {
            Self::Confirm => Self::Zero,
            Self::Zero => Self::FullScale {
                zero: ctx.analog.sample(),
            },
            Self::FullScale { zero } => {
                let calibration = Calibration::new(zero, ctx.analog.sample());
                ctx.store.save_calibration(&calibration);
                info!("Calibrated {}..{}", calibration.zero, calibration.full_scale);
                return ctx.go_home();
            }
        };
        Step::to(Screen::Calibrate(next))
    }

    /// Render the prompt for the current step.
    pub fn render(&self) -> Frame {
        match self {
            Self::Confirm => Frame::text(SetupItem::Calibrate.label(), "Enter-YES ESC-NO"),
            Self::Zero => Frame::text("Zero Press Enter", ""),
            Self::FullScale { .. } => Frame::text("Max Press Enter", ""),
        }
    }
}
