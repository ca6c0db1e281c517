//! In-memory host toolkit.
//!
//! Implements every host trait without a display. Windows are cheap
//! handles onto shared state, the way toolkit window pointers are, so a
//! test can keep one handle and hand another to the controller. All calls
//! that matter are recorded in a shared [`Recorder`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::TabStripStyle;
use crate::host::{
    Closable, Container, Embeddable, Focusable, HostApp, HostWindow, MenuBarMirror, Showable,
    Titled, WebSurface,
};
use crate::types::{Icon, KeyChord, Size, WindowFlags, WindowId};

/// What the headless container has been told so far
#[derive(Debug, Clone, Default)]
pub struct ContainerState {
    pub id: WindowId,
    pub title: String,
    pub size: Size,
    pub icon: Option<Icon>,
    pub visible: bool,
    pub activations: u32,
    pub raises: u32,
    pub tabs: Vec<(WindowId, String)>,
    pub current: Option<usize>,
    pub style: Option<TabStripStyle>,
    pub close_shortcut: Option<KeyChord>,
}

#[derive(Debug, Default)]
struct RecorderState {
    next_id: u64,
    container: ContainerState,
    notices: Vec<String>,
    pending_closed: VecDeque<String>,
    mirrored: Vec<WindowId>,
}

/// Shared log of everything the headless host saw
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<RecorderState>>);

impl Recorder {
    fn alloc_id(&self) -> WindowId {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        WindowId(0x40_0000 + state.next_id)
    }

    pub fn container(&self) -> ContainerState {
        self.0.borrow().container.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.0.borrow().notices.clone()
    }

    /// Menu bars mirrored onto the container, oldest first
    pub fn mirrored(&self) -> Vec<WindowId> {
        self.0.borrow().mirrored.clone()
    }

    /// Kinds whose windows accepted a close since the last call
    pub fn take_pending_closed(&self) -> Vec<String> {
        self.0.borrow_mut().pending_closed.drain(..).collect()
    }

    /// A window handle with the container's identity, as the host's
    /// focus-owner query would return it
    pub fn container_handle(&self) -> HeadlessWindow {
        let id = self.0.borrow().container.id;
        HeadlessWindow::with_id(self, id, "container", "")
    }
}

#[derive(Debug)]
struct WindowState {
    title: String,
    flags: WindowFlags,
    size: Size,
    realized: bool,
    visible: bool,
    close_count: u32,
    refuse_close: bool,
    compare: Option<bool>,
}

/// A web view whose surface mode is shared across clones
#[derive(Debug, Clone, Default)]
pub struct HeadlessWebView {
    native: Rc<Cell<bool>>,
}

impl WebSurface for HeadlessWebView {
    fn set_native_surface(&mut self, native: bool) {
        self.native.set(native);
    }

    fn has_native_surface(&self) -> bool {
        self.native.get()
    }
}

/// Handle onto a headless top-level window
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    id: WindowId,
    kind: String,
    state: Rc<RefCell<WindowState>>,
    web: Option<HeadlessWebView>,
    recorder: Recorder,
}

impl HeadlessWindow {
    /// A fresh, never-shown top-level window of `kind` with one web view
    pub fn new(recorder: &Recorder, kind: &str, title: &str) -> Self {
        let id = recorder.alloc_id();
        Self::with_id(recorder, id, kind, title)
    }

    fn with_id(recorder: &Recorder, id: WindowId, kind: &str, title: &str) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            state: Rc::new(RefCell::new(WindowState {
                title: title.to_string(),
                flags: WindowFlags::TOP_LEVEL
                    .with(WindowFlags::TITLE_HINT)
                    .with(WindowFlags::CLOSE_BUTTON_HINT),
                size: Size::new(800, 600),
                realized: false,
                visible: false,
                close_count: 0,
                refuse_close: false,
                compare: None,
            })),
            web: Some(HeadlessWebView::default()),
            recorder: recorder.clone(),
        }
    }

    /// Simulate the toolkit building the native window (geometry query)
    pub fn realize(&self) {
        self.state.borrow_mut().realized = true;
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn close_count(&self) -> u32 {
        self.state.borrow().close_count
    }

    /// Make `close()` refuse, like a window with unsaved changes
    pub fn set_refuse_close(&self, refuse: bool) {
        self.state.borrow_mut().refuse_close = refuse;
    }

    /// Result this window's own comparison logic gives
    pub fn set_compare_result(&self, result: Option<bool>) {
        self.state.borrow_mut().compare = result;
    }

    pub fn web_view(&self) -> Option<HeadlessWebView> {
        self.web.clone()
    }
}

impl Showable for HeadlessWindow {
    fn show(&mut self) {
        let mut state = self.state.borrow_mut();
        state.realized = true;
        state.visible = true;
    }

    fn hide(&mut self) {
        self.state.borrow_mut().visible = false;
    }
}

impl Closable for HeadlessWindow {
    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.close_count += 1;
        if state.refuse_close {
            return;
        }
        state.visible = false;
        self.recorder
            .0
            .borrow_mut()
            .pending_closed
            .push_back(self.kind.clone());
    }
}

impl Titled for HeadlessWindow {
    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }
}

impl Embeddable for HeadlessWindow {
    fn window_flags(&self) -> WindowFlags {
        self.state.borrow().flags
    }

    fn set_window_flags(&mut self, flags: WindowFlags) {
        self.state.borrow_mut().flags = flags;
    }

    fn is_realized(&self) -> bool {
        self.state.borrow().realized
    }
}

impl Focusable for HeadlessWindow {
    fn activate(&mut self) {}

    fn raise(&mut self) {}
}

impl HostWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn size(&self) -> Size {
        self.state.borrow().size
    }

    fn web_surface_mut(&mut self) -> Option<&mut dyn WebSurface> {
        self.web.as_mut().map(|w| w as &mut dyn WebSurface)
    }

    fn compare_with(&self, _other: WindowId) -> Option<bool> {
        self.state.borrow().compare
    }
}

/// The headless container window
pub struct HeadlessContainer {
    recorder: Recorder,
}

impl HeadlessContainer {
    pub fn new(recorder: &Recorder) -> Self {
        let id = recorder.alloc_id();
        recorder.0.borrow_mut().container.id = id;
        Self {
            recorder: recorder.clone(),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ContainerState) -> R) -> R {
        f(&mut self.recorder.0.borrow_mut().container)
    }
}

impl Showable for HeadlessContainer {
    fn show(&mut self) {
        self.with_state(|c| c.visible = true);
    }

    fn hide(&mut self) {
        self.with_state(|c| c.visible = false);
    }
}

impl Focusable for HeadlessContainer {
    fn activate(&mut self) {
        self.with_state(|c| c.activations += 1);
    }

    fn raise(&mut self) {
        self.with_state(|c| c.raises += 1);
    }
}

impl Container for HeadlessContainer {
    fn id(&self) -> WindowId {
        self.with_state(|c| c.id)
    }

    fn set_title(&mut self, title: &str) {
        self.with_state(|c| c.title = title.to_string());
    }

    fn resize(&mut self, size: Size) {
        self.with_state(|c| c.size = size);
    }

    fn set_icon(&mut self, icon: Option<&Icon>) {
        self.with_state(|c| c.icon = icon.cloned());
    }

    fn configure_tab_strip(&mut self, style: &TabStripStyle) {
        self.with_state(|c| c.style = Some(style.clone()));
    }

    fn register_close_shortcut(&mut self, chord: KeyChord) {
        self.with_state(|c| c.close_shortcut = Some(chord));
    }

    fn add_tab(&mut self, window: WindowId, label: &str) {
        self.with_state(|c| c.tabs.push((window, label.to_string())));
    }

    fn remove_tab(&mut self, index: usize) {
        self.with_state(|c| {
            if index < c.tabs.len() {
                c.tabs.remove(index);
            }
        });
    }

    fn set_tab_label(&mut self, index: usize, label: &str) {
        self.with_state(|c| {
            if let Some(tab) = c.tabs.get_mut(index) {
                tab.1 = label.to_string();
            }
        });
    }

    fn set_current_tab(&mut self, index: usize) {
        self.with_state(|c| c.current = Some(index));
    }
}

/// Headless notice sink
pub struct HeadlessApp {
    recorder: Recorder,
}

impl HeadlessApp {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl HostApp for HeadlessApp {
    fn show_notice(&mut self, text: &str) {
        log::info!("Notice: {}", text);
        self.recorder.0.borrow_mut().notices.push(text.to_string());
    }
}

/// Records which page's menu bar was mirrored
pub struct HeadlessMenuMirror {
    recorder: Recorder,
}

impl HeadlessMenuMirror {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl MenuBarMirror for HeadlessMenuMirror {
    fn mirror(&mut self, _container: &mut dyn Container, page: &dyn HostWindow) {
        self.recorder.0.borrow_mut().mirrored.push(page.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_handles_share_state() {
        let recorder = Recorder::default();
        let a = HeadlessWindow::new(&recorder, "Browser", "Browse");
        let mut b = a.clone();
        b.set_title("Browse (2 cards)");
        b.show();
        assert_eq!(a.title(), "Browse (2 cards)");
        assert!(a.is_visible());
        assert!(a.is_realized());
    }

    #[test]
    fn test_close_queues_report_unless_refused() {
        let recorder = Recorder::default();
        let mut w = HeadlessWindow::new(&recorder, "AddCards", "Add");
        w.set_refuse_close(true);
        w.close();
        assert!(recorder.take_pending_closed().is_empty());

        w.set_refuse_close(false);
        w.close();
        assert_eq!(recorder.take_pending_closed(), vec!["AddCards"]);
        assert!(recorder.take_pending_closed().is_empty());
        assert_eq!(w.close_count(), 2);
    }

    #[test]
    fn test_ids_are_unique() {
        let recorder = Recorder::default();
        let container = HeadlessContainer::new(&recorder);
        let a = HeadlessWindow::new(&recorder, "a", "a");
        let b = HeadlessWindow::new(&recorder, "b", "b");
        assert_ne!(a.id(), b.id());
        assert_ne!(container.id(), a.id());
        assert_eq!(recorder.container_handle().id(), container.id());
    }

    #[test]
    fn test_web_view_shared_across_clones() {
        let recorder = Recorder::default();
        let mut w = HeadlessWindow::new(&recorder, "main", "Main");
        let view = w.web_view().unwrap();
        w.web_surface_mut().unwrap().set_native_surface(true);
        assert!(view.has_native_surface());
    }
}
