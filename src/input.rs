//! Keyboard state as seen by the simulation.
//!
//! Keys are identified by browser-style strings (`"ArrowLeft"`, `"a"`,
//! `" "` …) so the entity code does not depend on the terminal backend.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crossterm::event::KeyCode;

// ── Key aliases ───────────────────────────────────────────────────────────────

pub const LEFT_KEYS: &[&str] = &["ArrowLeft", "a", "A"];
pub const RIGHT_KEYS: &[&str] = &["ArrowRight", "d", "D"];
pub const UP_KEYS: &[&str] = &["ArrowUp", "w", "W"];
pub const DOWN_KEYS: &[&str] = &["ArrowDown", "s", "S"];
pub const FIRE_KEYS: &[&str] = &[" ", "Space"];

/// Name a terminal key the way the alias tables above do. Keys the game has
/// no use for map to `None`.
pub fn key_name(code: &KeyCode) -> Option<String> {
    match code {
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

// ── Held-key snapshot ─────────────────────────────────────────────────────────

/// The set of keys currently held down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet {
    held: HashSet<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: impl Into<String>) {
        self.held.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// True if any of `keys` is held.
    pub fn any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        KeySet {
            held: iter.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Hold-window tracking ──────────────────────────────────────────────────────

/// How long a key stays held after its last press or repeat. Covers the gap
/// between a press and the first auto-repeat on common terminals.
pub const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Number of frames of length `frame` needed to cover `window`, at least one.
pub fn window_in_frames(window: Duration, frame: Duration) -> u64 {
    if frame.is_zero() {
        return 1;
    }
    (window.as_secs_f64() / frame.as_secs_f64()).ceil().max(1.0) as u64
}

/// Tracks the frame each key was last seen (press or repeat).
///
/// Terminals without key-release reporting only deliver repeated presses
/// while a key is held, so a key counts as held while its last sighting is
/// within `hold_window` frames. Release events, when the terminal reports
/// them, drop the key immediately.
#[derive(Clone, Debug)]
pub struct KeyTracker {
    last_seen: HashMap<String, u64>,
    hold_window: u64,
}

impl KeyTracker {
    pub fn new(hold_window: u64) -> Self {
        KeyTracker {
            last_seen: HashMap::new(),
            hold_window,
        }
    }

    /// A tracker holding keys for `window` of wall-clock time at the given
    /// frame length.
    pub fn with_duration(window: Duration, frame: Duration) -> Self {
        KeyTracker::new(window_in_frames(window, frame))
    }

    pub fn hold_window(&self) -> u64 {
        self.hold_window
    }

    pub fn seen(&mut self, key: impl Into<String>, frame: u64) {
        self.last_seen.insert(key.into(), frame);
    }

    pub fn released(&mut self, key: &str) {
        self.last_seen.remove(key);
    }

    pub fn is_held(&self, key: &str, frame: u64) -> bool {
        self.last_seen
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= self.hold_window)
            .unwrap_or(false)
    }

    /// Snapshot of every key still inside the hold window at `frame`.
    /// Expired entries are dropped.
    pub fn snapshot(&mut self, frame: u64) -> KeySet {
        let window = self.hold_window;
        self.last_seen
            .retain(|_, last| frame.saturating_sub(*last) <= window);
        self.last_seen.keys().cloned().collect()
    }
}
