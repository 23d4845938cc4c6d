mod state;

use crossterm::event::KeyCode;

pub use state::{App, ConfirmPopup};

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
    /// The terminal regained focus; reload history.
    FocusGained,
    /// The terminal lost focus; flush history.
    FocusLost,
}
