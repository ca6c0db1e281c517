//! Window demotion.
//!
//! A window can only be demoted from top-level to child before the toolkit
//! has built its native window object. Once shown (or once its frame
//! geometry has been queried) the platform window stack is already wired
//! up and flipping the flag afterwards corrupts it, so realized windows are
//! refused here instead.

use anyhow::{bail, Result};

use crate::host::{HostWindow, WebSurface};
use crate::types::WindowFlags;

/// Clear the top-level flag on `window`, leaving all other flags alone.
pub fn demote(window: &mut dyn HostWindow) -> Result<()> {
    if window.is_realized() {
        bail!(
            "window {} ({:?}) is already realized and cannot be demoted",
            window.id(),
            window.title()
        );
    }
    let flags = window.window_flags();
    window.set_window_flags(flags.without(WindowFlags::TOP_LEVEL));
    log::debug!("Demoted window {}", window.id());
    Ok(())
}

/// Put a web view on a native drawing surface.
///
/// Without it the view flashes black when its tab becomes visible.
pub fn fix_render_surface(web: &mut dyn WebSurface) {
    if !web.has_native_surface() {
        web.set_native_surface(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessWebView, HeadlessWindow, Recorder};
    use crate::host::Embeddable;

    #[test]
    fn test_demote_clears_only_top_level() {
        let recorder = Recorder::default();
        let mut window = HeadlessWindow::new(&recorder, "Browser", "Browse");
        let before = window.window_flags();
        assert!(before.contains(WindowFlags::TOP_LEVEL));

        demote(&mut window).unwrap();
        let after = window.window_flags();
        assert!(!after.contains(WindowFlags::TOP_LEVEL));
        assert_eq!(after, before.without(WindowFlags::TOP_LEVEL));
    }

    #[test]
    fn test_demote_refuses_realized_window() {
        let recorder = Recorder::default();
        let mut window = HeadlessWindow::new(&recorder, "Browser", "Browse");
        window.realize();
        let before = window.window_flags();

        assert!(demote(&mut window).is_err());
        assert_eq!(window.window_flags(), before);
    }

    #[test]
    fn test_fix_render_surface() {
        let mut web = HeadlessWebView::default();
        assert!(!web.has_native_surface());
        fix_render_surface(&mut web);
        assert!(web.has_native_surface());
        fix_render_surface(&mut web);
        assert!(web.has_native_surface());
    }
}
