//! Keystroke gate for the tab strip.
//!
//! The tab strip would otherwise grab arrow keys and Tab for its own focus
//! cycling, stealing them from the embedded pages. The gate swallows every
//! key press except the close-tab chord.

use crate::types::{EventDisposition, InputEvent, KeyChord};

/// Stateless event observer installed on the tab strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutGate {
    allowed: Option<KeyChord>,
}

impl ShortcutGate {
    /// Gate that lets exactly `allowed` through
    pub fn new(allowed: Option<KeyChord>) -> Self {
        Self { allowed }
    }

    /// Decide the disposition of one event.
    ///
    /// Suppressed key presses are also marked ignored.
    pub fn filter(&self, event: &mut InputEvent) -> EventDisposition {
        match event {
            InputEvent::KeyPress(key) => {
                if Some(key.chord) == self.allowed {
                    return EventDisposition::Propagate;
                }
                key.ignore();
                EventDisposition::Consumed
            }
            _ => EventDisposition::Propagate,
        }
    }
}
