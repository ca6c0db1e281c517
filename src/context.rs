//! Application-scoped context.
//!
//! Constructed exactly once, when the host's primary window exists but has
//! not been shown. The host integration keeps this one value and forwards
//! its window-open, show, close-report and input hooks to it.

use std::collections::HashSet;

use anyhow::Result;

use crate::config::Config;
use crate::controller::{HostOptions, TabHost};
use crate::demote::fix_render_surface;
use crate::host::{Container, HostApp, HostWindow, MenuBarMirror, WebSurface};
use crate::platform;
use crate::types::{EventDisposition, InputEvent, WindowId};

pub struct AppContext {
    config: Config,
    host: TabHost,
    /// Window kinds whose `show` now routes through the controller
    intercepted: HashSet<String>,
}

impl AppContext {
    pub fn new(
        config: Config,
        primary: Box<dyn HostWindow>,
        container: Box<dyn Container>,
        app: Box<dyn HostApp>,
        mirror: Option<Box<dyn MenuBarMirror>>,
    ) -> Result<Self> {
        let platform = platform::select(config.general.platform, mirror);
        let host = TabHost::new(
            HostOptions::from_config(&config),
            primary,
            container,
            app,
            platform,
        )?;
        Ok(Self {
            config,
            host,
            intercepted: HashSet::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &TabHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut TabHost {
        &mut self.host
    }

    // =========================================================================
    // Window-open path
    // =========================================================================

    /// Host is about to open a window of `kind`. The first open of a
    /// captured kind starts intercepting its `show`. Returns whether the
    /// kind is captured.
    pub fn on_window_open(&mut self, kind: &str) -> bool {
        if !self.config.captures(kind) {
            return false;
        }
        if self.intercepted.insert(kind.to_string()) {
            log::debug!("Intercepting show for {:?}", kind);
        }
        true
    }

    pub fn is_intercepted(&self, kind: &str) -> bool {
        self.intercepted.contains(kind)
    }

    /// Host `show()` on a window of `kind`.
    ///
    /// Pages route through the controller; a first show of an intercepted
    /// kind attaches it as a tab before the window's own show runs. Anything
    /// else opens as an ordinary window.
    pub fn show_window(&mut self, kind: &str, mut window: Box<dyn HostWindow>) {
        let id = window.id();
        if self.host.show_page(id) {
            return;
        }
        if !self.intercepted.contains(kind) {
            window.show();
            return;
        }
        if window.is_realized() {
            log::warn!(
                "Window {} of {:?} was realized before its first show, opening it unembedded",
                id,
                kind
            );
            window.show();
            return;
        }
        match self.host.attach(kind, window) {
            Ok(_) => {
                self.host.show_page(id);
            }
            Err(e) => log::error!("{:#}", e),
        }
    }

    pub fn hide_window(&mut self, window: WindowId) -> bool {
        self.host.hide_page(window)
    }

    pub fn set_window_title(&mut self, window: WindowId, title: &str) -> bool {
        self.host.set_page_title(window, title)
    }

    pub fn on_title_changed(&mut self, window: WindowId, title: &str) {
        self.host.on_title_changed(window, title);
    }

    pub fn request_focus(&mut self, window: WindowId) {
        self.host.request_focus(window);
    }

    pub fn request_raise(&mut self, window: WindowId) {
        self.host.request_raise(window);
    }

    // =========================================================================
    // Closing
    // =========================================================================

    /// Host bookkeeping confirmed the window registered as `name` closed
    pub fn on_host_reported_closed(&mut self, name: &str) {
        log::debug!("Host reported {:?} closed", name);
        self.host.on_host_reported_closed(name);
    }

    /// Host is about to ask whether `name` may close
    pub fn on_close_confirmation(&mut self, name: &str) {
        self.host.select_tab_if_exists(name);
    }

    pub fn on_close_shortcut(&mut self) {
        self.host.request_close_active_tab();
    }

    pub fn on_tab_close_requested(&mut self, index: usize) {
        self.host.on_tab_close_requested(index);
    }

    /// The host must ignore the container's close event after this
    pub fn on_container_close(&mut self) {
        self.host.on_container_close();
    }

    // =========================================================================
    // Tab strip and input
    // =========================================================================

    pub fn on_tab_selected(&mut self, index: usize) {
        self.host.on_tab_changed(index);
    }

    /// Event observer on the tab strip
    pub fn on_tab_strip_event(&mut self, event: &mut InputEvent) -> EventDisposition {
        let disposition = self.host.filter_tab_strip_event(event);
        if let InputEvent::KeyPress(key) = event {
            let details = format!(
                "keysym=0x{:x} mods=0x{:x} {:?}",
                key.chord.keysym, key.chord.modifiers, disposition
            );
            self.host.tracer_mut().trace_host_event("key_press", None, &details);
        }
        disposition
    }

    /// A web view was created anywhere in the host
    pub fn on_web_view_created(&mut self, web: &mut dyn WebSurface) {
        if self.config.general.fix_render_surface {
            fix_render_surface(web);
        }
    }

    /// Keyboard focus moved between windows
    pub fn on_focus_changed(&mut self, from: Option<WindowId>, to: Option<WindowId>) {
        let page = to
            .and_then(|w| self.host.page_for_window(w))
            .and_then(|id| self.host.page(id))
            .map(|p| p.name.clone());
        let details = format!("from={:?} to={:?}", from, to);
        log::debug!("Focus change: {}", details);
        self.host
            .tracer_mut()
            .trace_host_event("focus_changed", page.as_deref(), &details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformChoice;
    use crate::headless::{
        HeadlessApp, HeadlessContainer, HeadlessMenuMirror, HeadlessWebView, HeadlessWindow,
        Recorder,
    };
    use crate::state::PageState;
    use crate::types::{KeyChord, KeyEvent, CONTROL_MASK};

    fn context(config: Config) -> (Recorder, HeadlessWindow, AppContext) {
        let recorder = Recorder::default();
        let main = HeadlessWindow::new(&recorder, "main", "Main");
        let ctx = AppContext::new(
            config,
            Box::new(main.clone()),
            Box::new(HeadlessContainer::new(&recorder)),
            Box::new(HeadlessApp::new(&recorder)),
            Some(Box::new(HeadlessMenuMirror::new(&recorder))),
        )
        .unwrap();
        (recorder, main, ctx)
    }

    fn default_platform() -> Config {
        let mut config = Config::default();
        config.general.platform = PlatformChoice::Default;
        config
    }

    #[test]
    fn test_primary_web_view_fixed_at_startup() {
        let (_recorder, main, _ctx) = context(default_platform());
        assert!(main.web_view().unwrap().has_native_surface());
    }

    #[test]
    fn test_fix_can_be_disabled() {
        let mut config = default_platform();
        config.general.fix_render_surface = false;
        let (_recorder, main, mut ctx) = context(config);
        assert!(!main.web_view().unwrap().has_native_surface());

        let mut web = HeadlessWebView::default();
        ctx.on_web_view_created(&mut web);
        assert!(!web.has_native_surface());
    }

    #[test]
    fn test_later_web_views_are_fixed() {
        let (_recorder, _main, mut ctx) = context(default_platform());
        let mut web = HeadlessWebView::default();
        ctx.on_web_view_created(&mut web);
        assert!(web.has_native_surface());
    }

    #[test]
    fn test_show_of_intercepted_kind_attaches() {
        let (recorder, _main, mut ctx) = context(default_platform());
        assert!(ctx.on_window_open("Browser"));
        assert!(ctx.is_intercepted("Browser"));

        let browser = HeadlessWindow::new(&recorder, "Browser", "Browse");
        ctx.show_window("Browser", Box::new(browser.clone()));
        assert!(browser.is_visible());
        assert_eq!(ctx.host().tab_count(), 2);
        assert_eq!(ctx.host().page_state("Browser"), PageState::Active);

        // A second show re-selects rather than duplicating
        ctx.host_mut().activate_tab("main");
        ctx.show_window("Browser", Box::new(browser.clone()));
        assert_eq!(ctx.host().tab_count(), 2);
        assert_eq!(ctx.host().active_name().as_deref(), Some("Browser"));
    }

    #[test]
    fn test_uncaptured_kind_opens_standalone() {
        let mut config = default_platform();
        config.capture.exclude = vec!["Preferences".to_string()];
        let (recorder, _main, mut ctx) = context(config);

        assert!(!ctx.on_window_open("Preferences"));
        let prefs = HeadlessWindow::new(&recorder, "Preferences", "Preferences");
        ctx.show_window("Preferences", Box::new(prefs.clone()));
        assert!(prefs.is_visible());
        assert_eq!(ctx.host().tab_count(), 1);
    }

    #[test]
    fn test_realized_window_opens_unembedded() {
        let (recorder, _main, mut ctx) = context(default_platform());
        ctx.on_window_open("Browser");
        let browser = HeadlessWindow::new(&recorder, "Browser", "Browse");
        browser.realize();
        ctx.show_window("Browser", Box::new(browser.clone()));
        assert!(browser.is_visible());
        assert_eq!(ctx.host().tab_count(), 1);
    }

    #[test]
    fn test_close_confirmation_selects_tab() {
        let (recorder, _main, mut ctx) = context(default_platform());
        ctx.on_window_open("AddCards");
        ctx.show_window("AddCards", Box::new(HeadlessWindow::new(&recorder, "AddCards", "Add")));
        ctx.host_mut().activate_tab("main");

        ctx.on_close_confirmation("AddCards");
        assert_eq!(ctx.host().active_name().as_deref(), Some("AddCards"));
        ctx.on_close_confirmation("Nope");
        assert_eq!(ctx.host().active_name().as_deref(), Some("AddCards"));
    }

    #[test]
    fn test_default_platform_registers_shortcut() {
        let (recorder, _main, _ctx) = context(default_platform());
        assert_eq!(
            recorder.container().close_shortcut,
            Some(KeyChord::new(0x77, CONTROL_MASK))
        );
        assert!(recorder.mirrored().is_empty());
    }

    #[test]
    fn test_menu_mirror_platform() {
        let mut config = Config::default();
        config.general.platform = PlatformChoice::MenuMirror;
        let (recorder, main, mut ctx) = context(config);
        assert_eq!(recorder.container().close_shortcut, None);
        assert_eq!(recorder.mirrored(), vec![main.id()]);

        ctx.on_window_open("Browser");
        let browser = HeadlessWindow::new(&recorder, "Browser", "Browse");
        ctx.show_window("Browser", Box::new(browser.clone()));
        assert_eq!(recorder.mirrored(), vec![main.id(), browser.id()]);

        // The gate still lets the close chord through
        let mut ev = InputEvent::KeyPress(KeyEvent::new(KeyChord::new(0x77, CONTROL_MASK)));
        assert_eq!(ctx.on_tab_strip_event(&mut ev), EventDisposition::Propagate);
    }

    #[test]
    fn test_tab_strip_events_are_traced() {
        let (_recorder, _main, mut ctx) = context(default_platform());
        let mut ev = InputEvent::KeyPress(KeyEvent::new(KeyChord::new(0xff51, 0)));
        assert_eq!(ctx.on_tab_strip_event(&mut ev), EventDisposition::Consumed);
        let log = ctx.host().event_log();
        assert_eq!(log.last().unwrap().event_type, "key_press");
    }

    #[test]
    fn test_focus_change_traced_with_page_name() {
        let (_recorder, main, mut ctx) = context(default_platform());
        ctx.on_focus_changed(None, Some(main.id()));
        let log = ctx.host().event_log();
        let entry = log.last().unwrap();
        assert_eq!(entry.event_type, "focus_changed");
        assert_eq!(entry.page.as_deref(), Some("main"));
    }
}
