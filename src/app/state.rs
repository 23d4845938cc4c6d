use std::sync::mpsc::Receiver;

use crossterm::event::KeyCode;
use tracing::warn;

use crate::store::{ColorHistoryStore, StoreEvent};

use super::AppEvent;

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub store: ColorHistoryStore,
    store_events: Receiver<StoreEvent>,
    pub selected_index: usize,
    pub status: Option<String>,
    pub show_help: bool,
    pub confirm_clear: bool,
    pub confirm_popup: Option<ConfirmPopup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearHistory,
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub message: String,
    pub action: ConfirmAction,
}

impl App {
    /// Wraps the store and loads its history.
    pub fn new(mut store: ColorHistoryStore, confirm_clear: bool) -> Self {
        let store_events = store.subscribe();
        let mut app = Self {
            running: true,
            store,
            store_events,
            selected_index: 0,
            status: None,
            show_help: false,
            confirm_clear,
            confirm_popup: None,
        };
        app.activate();
        app.drain_store_events();
        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {}
            AppEvent::KeyPress(key) => self.handle_key(key),
            AppEvent::FocusGained => self.reload(),
            AppEvent::FocusLost => {
                self.deactivate();
            }
        }
        self.drain_store_events();
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.show_help {
            match key {
                KeyCode::Char('q') => self.running = false,
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char(' ') | KeyCode::Char('n') => self.generate(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Enter => self.preview_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') => {
                if self.confirm_clear {
                    self.open_confirm_clear();
                } else {
                    self.clear_history();
                }
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        let Some(popup) = self.confirm_popup.take() else {
            return;
        };
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => match popup.action {
                ConfirmAction::ClearHistory => self.clear_history(),
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.status = Some("Cancelled.".to_string());
            }
            _ => self.confirm_popup = Some(popup),
        }
    }

    /// Load history from disk and jump to the newest entry.
    fn activate(&mut self) {
        if let Err(err) = self.store.on_activate() {
            warn!(error = %err, "history load failed");
            self.status = Some(format!("Failed to load history: {err}"));
        }
        self.selected_index = self.store.len().saturating_sub(1);
    }

    /// Reload from disk, but never over changes that have not reached it.
    fn reload(&mut self) {
        if self.store.is_dirty() && !self.deactivate() {
            self.status = Some(format!(
                "{} Keeping unsaved history.",
                self.status.as_deref().unwrap_or_default()
            ));
            return;
        }
        self.activate();
    }

    /// Lifecycle save; returns whether the history reached disk.
    fn deactivate(&mut self) -> bool {
        match self.store.on_deactivate() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "history save failed");
                self.status = Some(format!("Failed to save history: {err}."));
                false
            }
        }
    }

    /// Explicit save requested by the user; overwrites even an unread file.
    fn save(&mut self) {
        if let Err(err) = self.store.save() {
            warn!(error = %err, "history save failed");
            self.status = Some(format!("Failed to save history: {err}."));
        }
    }

    fn generate(&mut self) {
        self.store.generate();
        // Keep the newest entry in view.
        self.selected_index = self.store.len().saturating_sub(1);
    }

    fn delete_selected(&mut self) {
        match self.store.delete(self.selected_index) {
            Ok(_) => {
                if self.selected_index >= self.store.len() {
                    self.selected_index = self.store.len().saturating_sub(1);
                }
            }
            Err(err) => self.status = Some(format!("Cannot delete: {err}")),
        }
    }

    fn open_confirm_clear(&mut self) {
        if self.store.is_empty() {
            self.status = Some("History is already empty.".to_string());
            return;
        }
        self.confirm_popup = Some(ConfirmPopup {
            message: format!("Clear all {} colors from history?", self.store.len()),
            action: ConfirmAction::ClearHistory,
        });
    }

    fn clear_history(&mut self) {
        self.store.clear_all();
        self.selected_index = 0;
    }

    fn move_selection_up(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
        self.preview_selected();
    }

    fn move_selection_down(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
        self.preview_selected();
    }

    fn preview_selected(&mut self) {
        if let Some(color) = self.store.history().get(self.selected_index).copied() {
            self.store.select(color);
        }
    }

    fn drain_store_events(&mut self) {
        for event in self.store_events.try_iter() {
            if let Some(message) = describe(&event) {
                self.status = Some(message);
            }
        }
    }
}

fn describe(event: &StoreEvent) -> Option<String> {
    match event {
        StoreEvent::Generated(color) => Some(format!("Generated {color}.")),
        StoreEvent::Deleted { index, color } => Some(format!("Deleted {color} at {index}.")),
        StoreEvent::Cleared => Some("History cleared.".to_string()),
        StoreEvent::Selected(_) => None,
        StoreEvent::Loaded { count } => Some(format!("Loaded {count} colors.")),
        StoreEvent::Saved { count } => Some(format!("Saved {count} colors.")),
    }
}
