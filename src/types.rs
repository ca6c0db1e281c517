//! Shared types used across multiple modules.
//!
//! This module contains common data structures to avoid circular dependencies
//! between the controller, the host traits and the headless backend.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identity of an embedded page. Generational, so a page opened after a
    /// close never aliases the removed one even under the same name.
    pub struct PageId;
}

/// Opaque identity of a host window, assigned by the host toolkit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Width and height of a window in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Window icon as reported by the host (a theme name or file path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon(pub String);

/// Window flag bits understood by the demotion step.
///
/// Only `TOP_LEVEL` is ever touched by this crate; the remaining bits are
/// carried through untouched so host-specific hints survive demotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowFlags(pub u32);

impl WindowFlags {
    /// Window is an independent top-level (platform) window
    pub const TOP_LEVEL: WindowFlags = WindowFlags(0x0000_0001);
    /// Window has a title bar
    pub const TITLE_HINT: WindowFlags = WindowFlags(0x0000_1000);
    /// Window has a close button
    pub const CLOSE_BUTTON_HINT: WindowFlags = WindowFlags(0x0800_0000);

    pub fn contains(self, other: WindowFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn without(self, other: WindowFlags) -> WindowFlags {
        WindowFlags(self.0 & !other.0)
    }

    pub fn with(self, other: WindowFlags) -> WindowFlags {
        WindowFlags(self.0 | other.0)
    }
}

// Modifier masks (X11 layout)
pub const SHIFT_MASK: u16 = 1;
pub const CONTROL_MASK: u16 = 4;
pub const MOD1_MASK: u16 = 8; // Alt
pub const MOD4_MASK: u16 = 64; // Super/Win/Cmd

/// A key plus the exact set of modifiers held with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyChord {
    pub keysym: u32,
    pub modifiers: u16,
}

impl KeyChord {
    pub fn new(keysym: u32, modifiers: u16) -> Self {
        Self { keysym, modifiers }
    }
}

/// A single key press or release delivered to an event observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub chord: KeyChord,
    /// Cleared when an observer ignores the event
    pub accepted: bool,
}

impl KeyEvent {
    pub fn new(chord: KeyChord) -> Self {
        Self {
            chord,
            accepted: true,
        }
    }

    /// Mark the event as ignored so no widget treats it as consumed input
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// Events an observer installed on the tab strip can see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    /// Mouse, paint, focus and everything else
    Other,
}

/// Whether an observer swallowed an event or let it continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Not handled: normal propagation continues
    Propagate,
    /// Handled: the event stops here
    Consumed,
}
