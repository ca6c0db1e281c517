//! Tab host controller.
//!
//! Owns the tab strip model, the logical-name map, the MRU list and every
//! bridge between the container and the embedded pages. The host's
//! lifecycle calls (show, hide, retitle, focus, raise, close) for captured
//! windows are routed here instead of acting on independent OS windows.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::config::{Config, TabStripStyle};
use crate::demote::{demote, fix_render_surface};
use crate::host::{Container, HostApp, HostWindow};
use crate::identity::{self, ComparisonPolicy, Identity};
use crate::input::ShortcutGate;
use crate::mru::MruList;
use crate::platform::PlatformAdapter;
use crate::state::{PageState, StateTransition, StateViolation, ViolationKind};
use crate::tab_strip::TabStrip;
use crate::tracing::{EventLogEntry, EventTracer};
use crate::types::{EventDisposition, InputEvent, KeyChord, PageId, WindowId};

/// Settings the controller needs from the configuration
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub primary_name: String,
    pub close_chord: Option<KeyChord>,
    /// Notice for refusing to close the primary page; `{quit}` is substituted
    pub close_primary_notice: String,
    pub fix_render_surface: bool,
    pub style: TabStripStyle,
}

impl HostOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary_name: config.general.primary_name.clone(),
            close_chord: config.close_tab_chord(),
            close_primary_notice: config.notices.close_primary.clone(),
            fix_render_surface: config.general.fix_render_surface,
            style: config.tab_strip.clone(),
        }
    }
}

impl Default for HostOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// One embedded page
pub struct Page {
    pub name: String,
    pub title: String,
    pub state: PageState,
    window: Box<dyn HostWindow>,
}

impl Page {
    pub fn window(&self) -> &dyn HostWindow {
        self.window.as_ref()
    }
}

/// Serialisable view of one tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabInfo {
    pub name: String,
    pub label: String,
    pub window: u64,
    pub state: PageState,
}

/// Serialisable view of the whole controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabHostSnapshot {
    pub platform: String,
    pub active: Option<String>,
    pub tabs: Vec<TabInfo>,
    pub mru: Vec<String>,
}

pub struct TabHost {
    container: Box<dyn Container>,
    app: Box<dyn HostApp>,
    platform: Box<dyn PlatformAdapter>,
    pages: SlotMap<PageId, Page>,
    names: HashMap<String, PageId>,
    strip: TabStrip,
    mru: MruList,
    primary: PageId,
    gate: ShortcutGate,
    close_primary_notice: String,
    tracer: EventTracer,
}

impl TabHost {
    /// Take over the primary host window and put it in the first tab.
    ///
    /// The primary window is demoted before anything else touches it.
    pub fn new(
        options: HostOptions,
        mut primary: Box<dyn HostWindow>,
        mut container: Box<dyn Container>,
        app: Box<dyn HostApp>,
        platform: Box<dyn PlatformAdapter>,
    ) -> Result<Self> {
        demote(primary.as_mut()).context("Failed to demote primary window")?;
        if options.fix_render_surface {
            if let Some(web) = primary.web_surface_mut() {
                fix_render_surface(web);
            }
        }

        let title = primary.title();
        container.set_title(&title);
        container.resize(primary.size());
        container.set_icon(primary.icon().as_ref());
        container.configure_tab_strip(&options.style);
        if let Some(chord) = platform.close_tab_shortcut(options.close_chord) {
            container.register_close_shortcut(chord);
        }

        let mut pages = SlotMap::with_key();
        let primary_id = pages.insert(Page {
            name: options.primary_name.clone(),
            title,
            state: PageState::Attached,
            window: primary,
        });
        let mut names = HashMap::new();
        names.insert(options.primary_name.clone(), primary_id);

        log::info!(
            "Tab host created on {} platform, primary page {:?}",
            platform.name(),
            options.primary_name
        );

        let mut host = Self {
            container,
            app,
            platform,
            pages,
            names,
            strip: TabStrip::new(),
            mru: MruList::new(),
            primary: primary_id,
            gate: ShortcutGate::new(options.close_chord),
            close_primary_notice: options.close_primary_notice,
            tracer: EventTracer::new(),
        };
        host.insert_tab(primary_id);
        Ok(host)
    }

    // =========================================================================
    // Attach / activate
    // =========================================================================

    /// Embed `window` under `name`, or re-select the page already registered
    /// under that name.
    pub fn attach(&mut self, name: &str, mut window: Box<dyn HostWindow>) -> Result<PageId> {
        if let Some(&id) = self.names.get(name) {
            if self.pages.get(id).map(|p| p.window.id()) != Some(window.id()) {
                log::warn!(
                    "Attach of {:?} with new window {} while the existing page is open, keeping existing",
                    name,
                    window.id()
                );
            }
            self.record(StateTransition::PageReactivated {
                name: name.to_string(),
            });
            self.select_page(id);
            return Ok(id);
        }

        demote(window.as_mut()).with_context(|| format!("Failed to attach {:?}", name))?;

        let title = window.title();
        let window_id = window.id();
        let id = self.pages.insert(Page {
            name: name.to_string(),
            title,
            state: PageState::Attached,
            window,
        });
        self.names.insert(name.to_string(), id);
        log::info!("Attached {:?} (window {})", name, window_id);
        self.record(StateTransition::PageAttached {
            name: name.to_string(),
            window: window_id.0,
        });

        self.insert_tab(id);
        self.select_page(id);
        Ok(id)
    }

    /// Make the tab registered under `name` active. Unknown names are ignored.
    pub fn activate_tab(&mut self, name: &str) {
        match self.names.get(name) {
            Some(&id) => self.select_page(id),
            None => log::debug!("activate_tab: no page named {:?}", name),
        }
    }

    /// Select the page's tab before the host asks whether it may close
    /// (e.g. an unsaved-changes prompt), so the prompt sits over its page.
    pub fn select_tab_if_exists(&mut self, name: &str) {
        self.activate_tab(name);
    }

    /// Tab strip selection changed to `new_index`, by click or programmatically.
    pub fn on_tab_changed(&mut self, new_index: usize) {
        let Some(id) = self.strip.page_at(new_index) else {
            log::debug!("on_tab_changed: no tab at index {}", new_index);
            return;
        };
        if self.strip.current_index() != Some(new_index) {
            self.strip.set_current(new_index);
            self.container.set_current_tab(new_index);
        }

        let previous = self
            .pages
            .iter()
            .find(|(pid, p)| *pid != id && p.state == PageState::Active)
            .map(|(pid, _)| pid);
        if let Some(prev) = previous {
            if let Some(page) = self.pages.get_mut(prev) {
                page.state = PageState::Inactive;
            }
        }
        if let Some(page) = self.pages.get_mut(id) {
            page.state = PageState::Active;
        }
        self.mru.touch(id);

        let from = previous.and_then(|p| self.pages.get(p)).map(|p| p.name.clone());
        let to = self.name_of(id);
        log::debug!("Tab changed to {} ({:?}), from {:?}", new_index, to, from);
        self.record(StateTransition::TabSwitched { from, to });

        if let Some(page) = self.pages.get(id) {
            self.platform
                .on_active_page_changed(self.container.as_mut(), page.window.as_ref());
        }
    }

    // =========================================================================
    // Closing
    // =========================================================================

    /// The user clicked a tab's close control. The page decides.
    pub fn on_tab_close_requested(&mut self, index: usize) {
        match self.strip.page_at(index) {
            Some(id) => self.close_page(id),
            None => log::debug!("on_tab_close_requested: no tab at index {}", index),
        }
    }

    /// Close-tab shortcut. The primary page is never closed this way.
    pub fn request_close_active_tab(&mut self) {
        let Some(id) = self.strip.current_page() else {
            return;
        };
        if id == self.primary {
            let notice = self
                .close_primary_notice
                .replace("{quit}", self.platform.quit_hint());
            self.app.show_notice(&notice);
            self.record(StateTransition::CloseRefused {
                name: self.name_of(id),
            });
            return;
        }
        self.close_page(id);
    }

    /// The host has finished closing the window registered under `name`.
    ///
    /// Focus moves to the most recently used surviving page before the tab
    /// goes away, then the bookkeeping for the page is dropped. The host
    /// owns the window's destruction.
    pub fn on_host_reported_closed(&mut self, name: &str) {
        let Some(&id) = self.names.get(name) else {
            log::debug!("Host reported {:?} closed, not a tracked page", name);
            return;
        };
        if id == self.primary {
            log::warn!("Host reported primary page {:?} closed, keeping it", name);
            return;
        }
        if let Some(page) = self.pages.get_mut(id) {
            page.state = PageState::Closing;
        }

        self.mru.remove(id);
        let fallback = self.mru.iter().find_map(|&p| self.strip.index_of(p));
        if let Some(index) = fallback {
            self.select_index(index);
        }

        if let Some(index) = self.strip.index_of(id) {
            log::debug!("Removing tab #{} for {:?}", index, name);
            let before = self.strip.current_index();
            if let Some((_, changed)) = self.strip.remove(index) {
                self.container.remove_tab(index);
                // Removal before the current tab shifts its index without changing the page
                if let Some(current) = self.strip.current_index() {
                    if changed || before != Some(current) {
                        self.container.set_current_tab(current);
                    }
                    if changed {
                        self.on_tab_changed(current);
                    }
                }
            }
        }

        self.names.remove(name);
        self.pages.remove(id);
        log::info!("Removed page {:?}", name);
        self.record(StateTransition::PageRemoved {
            name: name.to_string(),
        });
    }

    /// The container itself was asked to close: close the primary page
    /// instead. The container's own close event is always ignored; it goes
    /// away when the host quits.
    pub fn on_container_close(&mut self) {
        self.record(StateTransition::ContainerCloseRedirected);
        if let Some(page) = self.pages.get_mut(self.primary) {
            page.window.close();
        }
    }

    // =========================================================================
    // Lifecycle bridges
    // =========================================================================

    /// Title-changed notification from a page
    pub fn on_title_changed(&mut self, window: WindowId, title: &str) {
        let Some(id) = self.page_for_window(window) else {
            return;
        };
        if let Some(page) = self.pages.get_mut(id) {
            if page.title == title {
                return;
            }
            page.title = title.to_string();
        }
        if let Some(index) = self.strip.index_of(id) {
            self.strip.set_label(index, title);
            self.container.set_tab_label(index, title);
        }
        self.record(StateTransition::TitleChanged {
            name: self.name_of(id),
            title: title.to_string(),
        });
    }

    /// Host `set_title` on a page. The primary page's title is also the
    /// container's title.
    pub fn set_page_title(&mut self, window: WindowId, title: &str) -> bool {
        let Some(id) = self.page_for_window(window) else {
            return false;
        };
        if id == self.primary {
            self.container.set_title(title);
        }
        if let Some(page) = self.pages.get_mut(id) {
            page.window.set_title(title);
        }
        self.on_title_changed(window, title);
        true
    }

    /// Host `show` on a page. Returns false if the window is not a page.
    pub fn show_page(&mut self, window: WindowId) -> bool {
        let Some(id) = self.page_for_window(window) else {
            return false;
        };
        if id == self.primary {
            self.container.show();
        } else {
            self.select_page(id);
            if let Some(page) = self.pages.get_mut(id) {
                page.window.show();
            }
        }
        true
    }

    /// Host `hide` on a page. Returns false if the window is not a page.
    pub fn hide_page(&mut self, window: WindowId) -> bool {
        let Some(id) = self.page_for_window(window) else {
            return false;
        };
        if id == self.primary {
            self.container.hide();
        } else if let Some(page) = self.pages.get_mut(id) {
            page.window.hide();
        }
        true
    }

    /// Host focus request on a page: select its tab, activate the container
    pub fn request_focus(&mut self, window: WindowId) {
        if let Some(id) = self.page_for_window(window) {
            self.select_page(id);
        }
        self.container.activate();
    }

    /// Host raise request on a page: select its tab, raise the container
    pub fn request_raise(&mut self, window: WindowId) {
        if let Some(id) = self.page_for_window(window) {
            self.select_page(id);
        }
        self.container.raise();
    }

    /// Event observer on the tab strip
    pub fn filter_tab_strip_event(&self, event: &mut InputEvent) -> EventDisposition {
        self.gate.filter(event)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn comparison_policy(&self) -> ComparisonPolicy {
        ComparisonPolicy {
            container: self.container.id(),
            active_page: self.active_window(),
        }
    }

    /// `container == other` as the host's focus checks see it
    pub fn container_compare(&self, other: &dyn HostWindow) -> Identity {
        self.comparison_policy().compare(other)
    }

    pub fn container_eq(&self, other: &dyn HostWindow) -> bool {
        self.comparison_policy().is_eq(other)
    }

    pub fn container_ne(&self, other: &dyn HostWindow) -> bool {
        self.comparison_policy().is_ne(other)
    }

    pub fn current_focus_target(&self) -> WindowId {
        identity::current_focus_target(&self.comparison_policy())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn container_id(&self) -> WindowId {
        self.container.id()
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn page_id(&self, name: &str) -> Option<PageId> {
        self.names.get(name).copied()
    }

    pub fn page_state(&self, name: &str) -> PageState {
        self.page_id(name)
            .and_then(|id| self.pages.get(id))
            .map(|p| p.state)
            .unwrap_or(PageState::Unregistered)
    }

    pub fn active_page(&self) -> Option<PageId> {
        self.strip.current_page()
    }

    pub fn active_name(&self) -> Option<String> {
        self.active_page().map(|id| self.name_of(id))
    }

    pub fn active_window(&self) -> Option<WindowId> {
        self.active_page()
            .and_then(|id| self.pages.get(id))
            .map(|p| p.window.id())
    }

    pub fn tab_count(&self) -> usize {
        self.strip.len()
    }

    pub fn tab_labels(&self) -> Vec<String> {
        self.strip.tabs().iter().map(|t| t.label.clone()).collect()
    }

    pub fn mru_names(&self) -> Vec<String> {
        self.mru.iter().map(|&id| self.name_of(id)).collect()
    }

    pub fn page_for_window(&self, window: WindowId) -> Option<PageId> {
        self.pages
            .iter()
            .find(|(_, p)| p.window.id() == window)
            .map(|(id, _)| id)
    }

    pub fn platform_name(&self) -> &'static str {
        self.platform.name()
    }

    pub fn event_log(&self) -> Vec<EventLogEntry> {
        self.tracer.get_all()
    }

    pub fn tracer_mut(&mut self) -> &mut EventTracer {
        &mut self.tracer
    }

    pub fn snapshot(&self) -> TabHostSnapshot {
        let tabs = self
            .strip
            .tabs()
            .iter()
            .filter_map(|t| {
                self.pages.get(t.page).map(|p| TabInfo {
                    name: p.name.clone(),
                    label: t.label.clone(),
                    window: p.window.id().0,
                    state: p.state,
                })
            })
            .collect();
        TabHostSnapshot {
            platform: self.platform.name().to_string(),
            active: self.active_name(),
            tabs,
            mru: self.mru_names(),
        }
    }

    /// Check the invariants between strip, name map, MRU list and page states
    pub fn validate(&self) -> Vec<StateViolation> {
        let mut violations = Vec::new();
        let mut push = |kind: ViolationKind, description: String| {
            violations.push(StateViolation { kind, description });
        };

        let mru = self.mru.as_slice();
        for (i, id) in mru.iter().enumerate() {
            if mru[..i].contains(id) {
                push(ViolationKind::DuplicateMruEntry, format!("{:?} listed twice", id));
            }
            if !self.pages.contains_key(*id) {
                push(ViolationKind::StaleMruEntry, format!("{:?} no longer exists", id));
            }
        }

        for (name, id) in &self.names {
            if !self.pages.contains_key(*id) {
                push(ViolationKind::DanglingName, format!("{:?} -> {:?}", name, id));
            }
        }

        for (index, tab) in self.strip.tabs().iter().enumerate() {
            if !self.pages.contains_key(tab.page) {
                push(ViolationKind::OrphanedTab, format!("tab #{} ({:?})", index, tab.label));
            }
        }

        let current = self.strip.current_page();
        for (id, page) in &self.pages {
            if self.strip.index_of(id).is_none() {
                push(ViolationKind::PageWithoutTab, format!("{:?}", page.name));
            }
            let active = page.state == PageState::Active;
            if active != (current == Some(id)) {
                push(
                    ViolationKind::StateMismatch,
                    format!("{:?} is {:?}", page.name, page.state),
                );
            }
        }

        if self.strip.index_of(self.primary).is_none() {
            push(ViolationKind::PrimaryMissing, "primary page has no tab".to_string());
        }

        violations
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn name_of(&self, id: PageId) -> String {
        self.pages
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    fn record(&mut self, transition: StateTransition) {
        self.tracer.trace_transition(&transition);
    }

    /// Append the page's tab; the first tab on the strip becomes active.
    fn insert_tab(&mut self, id: PageId) {
        let Some(page) = self.pages.get(id) else {
            return;
        };
        let was_empty = self.strip.is_empty();
        let index = self.strip.add(id, &page.title);
        self.container.add_tab(page.window.id(), &page.title);
        if was_empty {
            self.container.set_current_tab(index);
            self.on_tab_changed(index);
        }
    }

    fn select_page(&mut self, id: PageId) {
        if let Some(index) = self.strip.index_of(id) {
            self.select_index(index);
        }
    }

    fn select_index(&mut self, index: usize) {
        if self.strip.set_current(index) {
            self.container.set_current_tab(index);
            self.on_tab_changed(index);
        }
    }

    fn close_page(&mut self, id: PageId) {
        let name = self.name_of(id);
        log::debug!("Forwarding close to {:?}", name);
        self.record(StateTransition::CloseRequested { name });
        if let Some(page) = self.pages.get_mut(id) {
            page.window.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessApp, HeadlessContainer, HeadlessWindow, Recorder};
    use crate::host::{Embeddable, Titled};
    use crate::platform::DefaultPlatform;
    use crate::types::WindowFlags;

    fn setup() -> (Recorder, HeadlessWindow, TabHost) {
        let recorder = Recorder::default();
        let main = HeadlessWindow::new(&recorder, "main", "Main");
        let host = TabHost::new(
            HostOptions::default(),
            Box::new(main.clone()),
            Box::new(HeadlessContainer::new(&recorder)),
            Box::new(HeadlessApp::new(&recorder)),
            Box::new(DefaultPlatform),
        )
        .unwrap();
        (recorder, main, host)
    }

    fn attach(host: &mut TabHost, recorder: &Recorder, name: &str) -> HeadlessWindow {
        let window = HeadlessWindow::new(recorder, name, name);
        host.attach(name, Box::new(window.clone())).unwrap();
        window
    }

    #[test]
    fn test_primary_is_first_tab_and_demoted() {
        let (recorder, main, host) = setup();
        assert_eq!(host.tab_count(), 1);
        assert_eq!(host.active_name().as_deref(), Some("main"));
        assert!(!main.window_flags().contains(WindowFlags::TOP_LEVEL));
        assert_eq!(recorder.container().title, "Main");
        assert_eq!(host.mru_names(), vec!["main"]);
        assert!(host.validate().is_empty());
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (recorder, _main, mut host) = setup();
        let w = attach(&mut host, &recorder, "Browser");
        let first = host.page_id("Browser").unwrap();
        host.activate_tab("main");

        let again = host.attach("Browser", Box::new(w.clone())).unwrap();
        assert_eq!(again, first);
        assert_eq!(host.tab_count(), 2);
        assert_eq!(host.active_name().as_deref(), Some("Browser"));
        assert_eq!(recorder.container().tabs.len(), 2);
    }

    #[test]
    fn test_attach_rejects_realized_window() {
        let (recorder, _main, mut host) = setup();
        let w = HeadlessWindow::new(&recorder, "Browser", "Browse");
        w.realize();
        assert!(host.attach("Browser", Box::new(w)).is_err());
        assert_eq!(host.tab_count(), 1);
        assert_eq!(host.page_state("Browser"), PageState::Unregistered);
    }

    #[test]
    fn test_mru_order_follows_tab_changes() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        attach(&mut host, &recorder, "B");
        attach(&mut host, &recorder, "C");

        let index = |host: &TabHost, name: &str| {
            host.tab_labels().iter().position(|l| l == name).unwrap()
        };
        for name in ["C", "A", "B"] {
            let i = index(&host, name);
            host.on_tab_changed(i);
        }
        assert_eq!(&host.mru_names()[..3], &["B", "A", "C"]);
        assert_eq!(host.active_name().as_deref(), Some("B"));
        assert_eq!(host.page_state("A"), PageState::Inactive);
        assert_eq!(host.page_state("B"), PageState::Active);
    }

    #[test]
    fn test_close_report_focuses_most_recent_survivor() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        attach(&mut host, &recorder, "B");
        attach(&mut host, &recorder, "C");
        host.activate_tab("C");
        host.activate_tab("A");
        host.activate_tab("B");

        host.on_host_reported_closed("B");
        assert_eq!(host.active_name().as_deref(), Some("A"));
        assert_eq!(host.page_id("B"), None);
        assert_eq!(host.tab_count(), 3);
        assert_eq!(host.mru_names(), vec!["A", "C", "main"]);
        assert!(host.validate().is_empty());
        assert_eq!(recorder.container().tabs.len(), 3);
    }

    #[test]
    fn test_unknown_and_primary_close_reports_are_ignored() {
        let (_recorder, _main, mut host) = setup();
        host.on_host_reported_closed("Nope");
        host.on_host_reported_closed("main");
        assert_eq!(host.tab_count(), 1);
        assert!(host.validate().is_empty());
    }

    #[test]
    fn test_double_close_report_is_noop() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        host.on_host_reported_closed("A");
        host.on_host_reported_closed("A");
        assert_eq!(host.tab_count(), 1);
        assert!(host.validate().is_empty());
    }

    #[test]
    fn test_name_reusable_after_close() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        let old = host.page_id("A").unwrap();
        host.on_host_reported_closed("A");
        attach(&mut host, &recorder, "A");
        let new = host.page_id("A").unwrap();
        assert_ne!(old, new);
        assert_eq!(host.tab_count(), 2);
    }

    #[test]
    fn test_close_shortcut_on_primary_is_refused() {
        let (recorder, main, mut host) = setup();
        host.request_close_active_tab();
        assert_eq!(recorder.notices(), vec!["Main window should be closed by Alt+F4 / Ctrl+Q"]);
        assert_eq!(host.tab_count(), 1);
        assert_eq!(main.close_count(), 0);
    }

    #[test]
    fn test_close_shortcut_forwards_to_page() {
        let (recorder, _main, mut host) = setup();
        let a = attach(&mut host, &recorder, "A");
        host.request_close_active_tab();
        assert_eq!(a.close_count(), 1);
        // The tab stays until the host confirms
        assert_eq!(host.tab_count(), 2);
        assert!(recorder.notices().is_empty());
    }

    #[test]
    fn test_tab_close_button_forwards_to_page() {
        let (recorder, _main, mut host) = setup();
        let a = attach(&mut host, &recorder, "A");
        host.on_tab_close_requested(1);
        host.on_tab_close_requested(9);
        assert_eq!(a.close_count(), 1);
        assert_eq!(host.tab_count(), 2);
    }

    #[test]
    fn test_container_close_redirects_to_primary() {
        let (_recorder, main, mut host) = setup();
        host.on_container_close();
        assert_eq!(main.close_count(), 1);
    }

    #[test]
    fn test_title_bridge() {
        let (recorder, main, mut host) = setup();
        let a = attach(&mut host, &recorder, "A");

        host.on_title_changed(a.id(), "Renamed");
        assert_eq!(host.tab_labels()[1], "Renamed");
        assert_eq!(recorder.container().tabs[1].1, "Renamed");
        assert_eq!(recorder.container().title, "Main");

        assert!(host.set_page_title(main.id(), "Main - profile"));
        assert_eq!(recorder.container().title, "Main - profile");
        assert_eq!(main.title(), "Main - profile");
        assert_eq!(host.tab_labels()[0], "Main - profile");
    }

    #[test]
    fn test_show_hide_routing() {
        let (recorder, main, mut host) = setup();
        let a = attach(&mut host, &recorder, "A");
        host.activate_tab("main");

        assert!(host.show_page(main.id()));
        assert!(recorder.container().visible);
        assert!(host.hide_page(main.id()));
        assert!(!recorder.container().visible);

        assert!(host.show_page(a.id()));
        assert_eq!(host.active_name().as_deref(), Some("A"));
        assert!(a.is_visible());
        assert!(!host.show_page(WindowId(9999)));
    }

    #[test]
    fn test_focus_and_raise_select_tab() {
        let (recorder, main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        host.request_focus(main.id());
        assert_eq!(host.active_name().as_deref(), Some("main"));
        assert_eq!(recorder.container().activations, 1);

        let a_window = host.page(host.page_id("A").unwrap()).unwrap().window().id();
        host.request_raise(a_window);
        assert_eq!(host.active_name().as_deref(), Some("A"));
        assert_eq!(recorder.container().raises, 1);
    }

    #[test]
    fn test_identity_shim() {
        let (recorder, main, mut host) = setup();
        let a = attach(&mut host, &recorder, "A");
        let container = recorder.container_handle();

        assert!(host.container_eq(&container));
        assert!(host.container_eq(&a));
        assert!(host.container_ne(&main));
        assert_eq!(host.container_compare(&main), Identity::Deferred(false));
        assert_eq!(host.current_focus_target(), a.id());

        main.set_compare_result(Some(true));
        assert!(host.container_eq(&main));
    }

    #[test]
    fn test_snapshot() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        let snap = host.snapshot();
        assert_eq!(snap.platform, "default");
        assert_eq!(snap.active.as_deref(), Some("A"));
        assert_eq!(snap.tabs.len(), 2);
        assert_eq!(snap.tabs[0].state, PageState::Inactive);
        assert_eq!(snap.mru, vec!["A", "main"]);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"active\":\"A\""));
    }

    #[test]
    fn test_closing_earlier_tab_keeps_container_in_step() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        attach(&mut host, &recorder, "B");
        let c = attach(&mut host, &recorder, "C");
        assert_eq!(recorder.container().current, Some(3));

        host.on_host_reported_closed("A");
        let container = recorder.container();
        assert_eq!(host.active_name().as_deref(), Some("C"));
        assert_eq!(container.current, Some(2));
        assert_eq!(container.tabs.len(), 3);
        assert_eq!(container.tabs[2].0, c.id());
        assert!(host.validate().is_empty());
    }

    #[test]
    fn test_closed_page_reads_unregistered() {
        let (recorder, _main, mut host) = setup();
        attach(&mut host, &recorder, "A");
        host.on_host_reported_closed("A");
        assert_eq!(host.page_state("A"), PageState::Unregistered);
        let log = host.event_log();
        let last = log.last().unwrap();
        assert_eq!(last.event_type, "page_removed");
        assert_eq!(last.page.as_deref(), Some("A"));
    }
}
