//! Test download to a PC.

use tracing::{debug, info};

use super::{Context, Event, MainItem, Screen, Step};
use crate::display::Frame;
use crate::hal::{Key, NonvolatileStore};
use crate::protocol::encode_dump;

/// Download progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadStage {
    /// Waiting for the PC to be connected.
    #[default]
    Connect,
    /// Tests sent; asking whether to clear them.
    ConfirmClear,
}

impl DownloadStage {
    /// Open the download screen. Returns home when nothing is stored.
    pub fn open<S: NonvolatileStore>(ctx: &mut Context<'_, S>) -> Step {
        if ctx.store.count() == 0 {
            debug!("No stored tests to download");
            return ctx.go_home();
        }
        Step::to(Screen::Download(Self::Connect))
    }

    /// Handle one event.
    pub fn handle<S: NonvolatileStore>(self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        if event != Event::Key(Key::Enter) {
            return Step::to(Screen::Download(self));
        }

        match self {
            Self::Connect => {
                let count = ctx.store.count();
                let dump = encode_dump(count, &ctx.store.stored_bytes());
                for &byte in dump.iter() {
                    ctx.uplink.send(byte);
                }
                info!("Sent {} tests ({} bytes)", count, dump.len());
                Step::to(Screen::Download(Self::ConfirmClear))
            }
            Self::ConfirmClear => {
                ctx.store.clear_all();
                ctx.go_home()
            }
        }
    }

    /// Render the prompt for the current stage.
    pub fn render(&self) -> Frame {
        match self {
            Self::Connect => Frame::text(MainItem::DownloadTests.label(), "Connect PC"),
            Self::ConfirmClear => Frame::text("Clear Tests?", "Enter-YES ESC-NO"),
        }
    }
}
