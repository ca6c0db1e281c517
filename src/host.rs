//! Capability interfaces between tabhost and the host toolkit.
//!
//! The host's windows, its container window and its notice mechanism are
//! external collaborators. The controller only ever talks to them through
//! these traits; implementations are thin handles onto host objects.

use crate::config::TabStripStyle;
use crate::types::{Icon, KeyChord, Size, WindowFlags, WindowId};

/// Show/hide lifecycle
pub trait Showable {
    fn show(&mut self);
    fn hide(&mut self);
}

/// Close request. The host may refuse; when it accepts it later reports
/// the closure through its own "window closed" path.
pub trait Closable {
    fn close(&mut self);
}

/// Window title
pub trait Titled {
    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);
}

/// Window flags and realization state, as needed for demotion
pub trait Embeddable {
    fn window_flags(&self) -> WindowFlags;
    fn set_window_flags(&mut self, flags: WindowFlags);
    /// True once the window has been shown or had its frame geometry queried
    fn is_realized(&self) -> bool;
}

/// Focus and stacking requests
pub trait Focusable {
    fn activate(&mut self);
    fn raise(&mut self);
}

/// A web-content child view
pub trait WebSurface {
    fn set_native_surface(&mut self, native: bool);
    fn has_native_surface(&self) -> bool;
}

/// One host window that may become a page
pub trait HostWindow: Showable + Closable + Titled + Embeddable + Focusable {
    fn id(&self) -> WindowId;

    fn size(&self) -> Size;

    fn icon(&self) -> Option<Icon> {
        None
    }

    /// Main web view of this window, if it has one
    fn web_surface_mut(&mut self) -> Option<&mut dyn WebSurface> {
        None
    }

    /// The window's own equality special-cases against `other`.
    /// `None` means it has none and plain identity applies.
    fn compare_with(&self, _other: WindowId) -> Option<bool> {
        None
    }
}

/// The single container window and its tab-strip view.
///
/// The controller owns the tab model; the container only mirrors it.
pub trait Container: Showable + Focusable {
    fn id(&self) -> WindowId;
    fn set_title(&mut self, title: &str);
    fn resize(&mut self, size: Size);
    fn set_icon(&mut self, icon: Option<&Icon>);

    fn configure_tab_strip(&mut self, style: &TabStripStyle);
    /// Register `chord` as a container-wide shortcut for closing the current tab
    fn register_close_shortcut(&mut self, chord: KeyChord);

    fn add_tab(&mut self, window: WindowId, label: &str);
    fn remove_tab(&mut self, index: usize);
    fn set_tab_label(&mut self, index: usize, label: &str);
    fn set_current_tab(&mut self, index: usize);
}

/// Host application services
pub trait HostApp {
    /// Transient, non-blocking notice (tooltip)
    fn show_notice(&mut self, text: &str);
}

/// Copies a page's menu bar onto the container on platforms with a global menu bar
pub trait MenuBarMirror {
    fn mirror(&mut self, container: &mut dyn Container, page: &dyn HostWindow);
}
