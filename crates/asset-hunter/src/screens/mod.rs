#![forbid(unsafe_code)]

//! Screens hosted by the application shell.
//!
//! Each screen implements [`Screen`]. The shell owns global keys and chrome;
//! everything else is forwarded to the active screen.

pub mod dashboard;

use ftui_core::event::Event;
use ftui_core::geometry::Rect;
use ftui_render::frame::Frame;
use ftui_runtime::Cmd;

pub use crate::chrome::HelpEntry;

/// A full-content screen.
pub trait Screen {
    /// Message type produced by this screen's commands.
    type Message: Send + 'static;

    /// Handle a screen-specific event, returning a command.
    fn update(&mut self, event: &Event) -> Cmd<Self::Message>;

    /// Render the screen into the given area.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Return keybindings specific to this screen for the help overlay.
    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![]
    }

    /// Called on each application tick (100ms interval) with the global tick count.
    fn tick(&mut self, _tick_count: u64) {}

    /// Whether the screen is showing a modal layer that should receive Esc.
    fn has_modal(&self) -> bool {
        false
    }

    /// Title shown in the breadcrumb.
    fn title(&self) -> &'static str;
}
