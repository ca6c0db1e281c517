//! Platform strategy, selected once at startup.
//!
//! Two behaviours differ by platform family: whether the close-tab chord is
//! registered as a container shortcut, and whether the active page's menu
//! bar is mirrored onto the container's global menu bar.

use crate::config::PlatformChoice;
use crate::host::{Container, HostWindow, MenuBarMirror};
use crate::types::KeyChord;

pub trait PlatformAdapter {
    fn name(&self) -> &'static str;

    /// Chord to register as a container shortcut, given the configured one
    fn close_tab_shortcut(&self, configured: Option<KeyChord>) -> Option<KeyChord>;

    /// How the user quits the application, for notices
    fn quit_hint(&self) -> &'static str;

    /// Called after the active tab changed to `page`
    fn on_active_page_changed(&mut self, _container: &mut dyn Container, _page: &dyn HostWindow) {}
}

/// Platforms with per-window menu bars
#[derive(Debug, Default)]
pub struct DefaultPlatform;

impl PlatformAdapter for DefaultPlatform {
    fn name(&self) -> &'static str {
        "default"
    }

    fn close_tab_shortcut(&self, configured: Option<KeyChord>) -> Option<KeyChord> {
        configured
    }

    fn quit_hint(&self) -> &'static str {
        "Alt+F4 / Ctrl+Q"
    }
}

/// Platforms with one global menu bar. The native close-window chord is
/// left to the menu bar, so no container shortcut is registered.
pub struct MenuMirrorPlatform {
    mirror: Box<dyn MenuBarMirror>,
}

impl MenuMirrorPlatform {
    pub fn new(mirror: Box<dyn MenuBarMirror>) -> Self {
        Self { mirror }
    }
}

impl PlatformAdapter for MenuMirrorPlatform {
    fn name(&self) -> &'static str {
        "menu_mirror"
    }

    fn close_tab_shortcut(&self, _configured: Option<KeyChord>) -> Option<KeyChord> {
        None
    }

    fn quit_hint(&self) -> &'static str {
        "Cmd+Q"
    }

    fn on_active_page_changed(&mut self, container: &mut dyn Container, page: &dyn HostWindow) {
        self.mirror.mirror(container, page);
    }
}

/// Pick the adapter for `choice`.
///
/// Falls back to the default adapter when menu mirroring is wanted but the
/// host supplied no mirror.
pub fn select(choice: PlatformChoice, mirror: Option<Box<dyn MenuBarMirror>>) -> Box<dyn PlatformAdapter> {
    let wants_mirror = match choice {
        PlatformChoice::Auto => cfg!(target_os = "macos"),
        PlatformChoice::Default => false,
        PlatformChoice::MenuMirror => true,
    };
    match (wants_mirror, mirror) {
        (true, Some(mirror)) => Box::new(MenuMirrorPlatform::new(mirror)),
        (true, None) => {
            log::warn!("Menu mirroring requested but no mirror available, using default platform");
            Box::new(DefaultPlatform)
        }
        (false, _) => Box::new(DefaultPlatform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessMenuMirror, Recorder};
    use crate::types::CONTROL_MASK;

    #[test]
    fn test_default_registers_configured_chord() {
        let chord = KeyChord::new(0x77, CONTROL_MASK);
        let platform = select(PlatformChoice::Default, None);
        assert_eq!(platform.name(), "default");
        assert_eq!(platform.close_tab_shortcut(Some(chord)), Some(chord));
    }

    #[test]
    fn test_menu_mirror_skips_shortcut() {
        let recorder = Recorder::default();
        let mirror = Box::new(HeadlessMenuMirror::new(&recorder));
        let platform = select(PlatformChoice::MenuMirror, Some(mirror));
        assert_eq!(platform.name(), "menu_mirror");
        assert_eq!(platform.close_tab_shortcut(Some(KeyChord::new(0x77, CONTROL_MASK))), None);
        assert_eq!(platform.quit_hint(), "Cmd+Q");
    }

    #[test]
    fn test_menu_mirror_without_mirror_falls_back() {
        let platform = select(PlatformChoice::MenuMirror, None);
        assert_eq!(platform.name(), "default");
    }
}
