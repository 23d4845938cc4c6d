/// Color history state: generation, selection, deletion and persistence.
mod persist;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use rand::RngExt;
use thiserror::Error;
use tracing::{debug, info};

use crate::color::Color;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("index {index} is out of range for a history of {len} colors")]
    OutOfRange { index: usize, len: usize },
    #[error("failed to read history from {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write history to {}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("not overwriting {}: it could not be read; save explicitly to replace it", .path.display())]
    Unread { path: PathBuf },
}

/// Change notifications sent to subscribers after each successful mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    Generated(Color),
    Deleted { index: usize, color: Color },
    Cleared,
    Selected(Color),
    Loaded { count: usize },
    Saved { count: usize },
}

/// Single-owner store for the color history and the current color.
pub struct ColorHistoryStore {
    path: PathBuf,
    history: Vec<Color>,
    current: Color,
    subscribers: Vec<Sender<StoreEvent>>,
    /// History changed since the last successful load or save.
    dirty: bool,
    /// The last load failed, so the file on disk was never seen.
    load_failed: bool,
}

impl ColorHistoryStore {
    /// Creates an empty store backed by the history file at `path`.
    /// Nothing is read until [`ColorHistoryStore::on_activate`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            history: Vec::new(),
            current: Color::WHITE,
            subscribers: Vec::new(),
            dirty: false,
            load_failed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Oldest first.
    pub fn history(&self) -> &[Color] {
        &self.history
    }

    pub fn current(&self) -> Color {
        self.current
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// True when the history holds changes not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Register a new listener. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn generate(&mut self) -> Color {
        self.generate_with(&mut rand::rng())
    }

    /// Append a random color drawn from `rng` and make it current.
    pub fn generate_with<R: RngExt + ?Sized>(&mut self, rng: &mut R) -> Color {
        let color = Color::random(rng);
        self.history.push(color);
        self.current = color;
        self.dirty = true;
        debug!(%color, len = self.history.len(), "generated color");
        self.emit(StoreEvent::Generated(color));
        color
    }

    /// Remove the entry at `index`. The current color is left alone.
    pub fn delete(&mut self, index: usize) -> Result<Color, StoreError> {
        let len = self.history.len();
        if index >= len {
            return Err(StoreError::OutOfRange { index, len });
        }
        let color = self.history.remove(index);
        self.dirty = true;
        debug!(index, %color, "deleted color");
        self.emit(StoreEvent::Deleted { index, color });
        Ok(color)
    }

    /// Empty the history and reset the current color to white.
    pub fn clear_all(&mut self) {
        self.history.clear();
        self.current = Color::WHITE;
        self.dirty = true;
        debug!("cleared history");
        self.emit(StoreEvent::Cleared);
    }

    /// Preview any color without touching the history.
    pub fn select(&mut self, color: Color) {
        self.current = color;
        self.emit(StoreEvent::Selected(color));
    }

    pub fn contrast_label(color: Color) -> Color {
        color.contrast_label()
    }

    pub fn to_display_string(color: Color) -> String {
        color.to_display_string()
    }

    /// Replace the in-memory history with the persisted one.
    ///
    /// On a read failure the in-memory state is kept, the error returned, and
    /// lifecycle saves refuse to overwrite the file until a load succeeds or
    /// [`ColorHistoryStore::save`] is called.
    pub fn on_activate(&mut self) -> Result<(), StoreError> {
        let history = match persist::load(&self.path) {
            Ok(history) => history,
            Err(source) => {
                self.load_failed = true;
                return Err(StoreError::Load {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        self.history = history;
        self.current = self.history.last().copied().unwrap_or(Color::WHITE);
        self.dirty = false;
        self.load_failed = false;
        let count = self.history.len();
        info!(count, path = %self.path.display(), "loaded history");
        self.emit(StoreEvent::Loaded { count });
        Ok(())
    }

    /// Flush the history to disk, unless the file there was never read.
    pub fn on_deactivate(&mut self) -> Result<(), StoreError> {
        if self.load_failed {
            return Err(StoreError::Unread {
                path: self.path.clone(),
            });
        }
        self.save()
    }

    /// Write the history to disk, replacing whatever was there.
    pub fn save(&mut self) -> Result<(), StoreError> {
        persist::save(&self.path, &self.history).map_err(|source| StoreError::Save {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        self.load_failed = false;
        let count = self.history.len();
        info!(count, path = %self.path.display(), "saved history");
        self.emit(StoreEvent::Saved { count });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load_file(path: &Path) -> Vec<Color> {
        persist::load(path).unwrap()
    }

    fn store_in(dir: &TempDir) -> ColorHistoryStore {
        ColorHistoryStore::new(dir.path().join("history.txt"))
    }

    #[test]
    fn starts_empty_and_white() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert_eq!(store.current(), Color::WHITE);
    }

    #[test]
    fn generate_appends_and_becomes_current() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for expected_len in 1..=5 {
            let color = store.generate();
            assert_eq!(store.len(), expected_len);
            assert_eq!(store.current(), color);
            assert_eq!(store.history().last(), Some(&color));
        }
    }

    #[test]
    fn delete_removes_one_entry_and_keeps_current() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let first = store.generate();
        let second = store.generate();
        let third = store.generate();

        assert_eq!(store.delete(1).unwrap(), second);
        assert_eq!(store.history(), &[first, third]);
        assert_eq!(store.current(), third);
    }

    #[test]
    fn delete_out_of_range_leaves_history_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.generate();
        store.generate();
        let before = store.history().to_vec();

        let err = store.delete(2).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange { index: 2, len: 2 }));
        assert_eq!(store.history(), before.as_slice());

        let mut empty = store_in(&dir);
        assert!(matches!(
            empty.delete(0),
            Err(StoreError::OutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn clear_all_empties_and_resets_current() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.clear_all();
        assert!(store.is_empty());

        for _ in 0..3 {
            store.generate();
        }
        store.clear_all();
        assert_eq!(store.len(), 0);
        assert_eq!(store.current(), Color::WHITE);
    }

    #[test]
    fn select_previews_without_mutating_history() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let first = store.generate();
        store.generate();
        store.select(first);
        assert_eq!(store.current(), first);
        assert_eq!(store.len(), 2);

        let outside = Color::new(1, 2, 3);
        store.select(outside);
        assert_eq!(store.current(), outside);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn deactivate_then_activate_restores_history() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let colors: Vec<Color> = (0..4).map(|_| store.generate()).collect();
        store.on_deactivate().unwrap();

        let mut reopened = store_in(&dir);
        reopened.on_activate().unwrap();
        assert_eq!(reopened.history(), colors.as_slice());
        assert_eq!(reopened.current(), colors[3]);
    }

    #[test]
    fn activate_without_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.on_activate().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.current(), Color::WHITE);
    }

    #[test]
    fn activate_replaces_in_memory_history() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("history.txt"), "#112233\nnot-a-color\n#445566\n").unwrap();
        let mut store = store_in(&dir);
        store.generate();
        store.on_activate().unwrap();
        assert_eq!(
            store.history(),
            &[Color::new(0x11, 0x22, 0x33), Color::new(0x44, 0x55, 0x66)]
        );
    }

    #[test]
    fn activate_on_unreadable_path_reports_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be cannot be read as text.
        let mut store = ColorHistoryStore::new(dir.path());
        assert!(matches!(store.on_activate(), Err(StoreError::Load { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();
        let mut store = ColorHistoryStore::new(blocker.join("history.txt"));
        store.generate();
        assert!(matches!(store.on_deactivate(), Err(StoreError::Save { .. })));
        assert!(store.is_dirty());
    }

    #[test]
    fn dirty_tracks_unsaved_mutations() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(!store.is_dirty());
        store.select(Color::BLACK);
        assert!(!store.is_dirty());

        store.generate();
        assert!(store.is_dirty());
        store.on_deactivate().unwrap();
        assert!(!store.is_dirty());

        store.delete(0).unwrap();
        assert!(store.is_dirty());
        store.on_activate().unwrap();
        assert!(!store.is_dirty());

        store.clear_all();
        assert!(store.is_dirty());
    }

    #[test]
    fn failed_load_keeps_in_memory_history() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let color = store.generate();
        store.path = dir.path().to_path_buf();
        assert!(store.on_activate().is_err());
        assert_eq!(store.history(), &[color]);
        assert_eq!(store.current(), color);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_history_is_not_overwritten_on_deactivate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        // Resolving a link to itself fails with ELOOP.
        std::os::unix::fs::symlink(&path, &path).unwrap();
        let mut store = ColorHistoryStore::new(&path);

        assert!(matches!(store.on_activate(), Err(StoreError::Load { .. })));
        store.generate();
        assert!(matches!(
            store.on_deactivate(),
            Err(StoreError::Unread { .. })
        ));
        assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());

        // An explicit save replaces it and re-enables lifecycle saves.
        store.save().unwrap();
        assert!(!fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
        assert_eq!(load_file(&path).len(), 1);
        store.on_deactivate().unwrap();
    }

    #[test]
    fn successful_load_clears_the_overwrite_guard() {
        let dir = TempDir::new().unwrap();
        let mut store = ColorHistoryStore::new(dir.path());
        assert!(store.on_activate().is_err());
        store.path = dir.path().join("history.txt");
        store.on_activate().unwrap();
        store.generate();
        store.on_deactivate().unwrap();
        assert_eq!(load_file(&store.path).len(), 1);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let rx = store.subscribe();

        let color = store.generate();
        store.select(Color::BLACK);
        store.delete(0).unwrap();
        assert!(store.delete(0).is_err());
        store.clear_all();
        store.on_deactivate().unwrap();
        store.on_activate().unwrap();

        let events: Vec<StoreEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                StoreEvent::Generated(color),
                StoreEvent::Selected(Color::BLACK),
                StoreEvent::Deleted { index: 0, color },
                StoreEvent::Cleared,
                StoreEvent::Saved { count: 0 },
                StoreEvent::Loaded { count: 0 },
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let kept = store.subscribe();
        drop(store.subscribe());
        store.generate();
        assert_eq!(store.subscribers.len(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }

    #[test]
    fn static_helpers_match_color_methods() {
        assert_eq!(ColorHistoryStore::contrast_label(Color::WHITE), Color::BLACK);
        assert_eq!(ColorHistoryStore::contrast_label(Color::BLACK), Color::WHITE);
        assert_eq!(
            ColorHistoryStore::to_display_string(Color::new(10, 20, 30)),
            "#0A141E"
        );
    }
}
