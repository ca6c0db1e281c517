//! Scripted host sessions run against the headless backend.
//!
//! A scenario is a list of host-side actions (open a window, click a tab,
//! press a key, ...). The runner plays them through an [`AppContext`],
//! feeding accepted closes back as host close reports after every step,
//! and returns the final controller state.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{parse_key_binding, Config};
use crate::context::AppContext;
use crate::controller::TabHostSnapshot;
use crate::headless::{
    HeadlessApp, HeadlessContainer, HeadlessMenuMirror, HeadlessWebView, HeadlessWindow, Recorder,
};
use crate::host::HostWindow;
use crate::state::StateViolation;
use crate::tracing::EventLogEntry;
use crate::types::{EventDisposition, InputEvent, KeyEvent};

/// One host-side action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Open (or re-open) a window of `kind`
    Open {
        kind: String,
        #[serde(default)]
        title: Option<String>,
    },
    Hide { kind: String },
    SetTitle { kind: String, title: String },
    Focus { kind: String },
    Raise { kind: String },
    /// User clicked a tab
    SelectTab { index: usize },
    /// User clicked a tab's close control
    CloseTab { index: usize },
    /// Key press on the tab strip, e.g. "Ctrl+w"
    Key { chord: String },
    /// Make a window refuse (or accept) close requests
    RefuseClose { kind: String, refuse: bool },
    /// Host is about to ask whether `kind` may close
    ConfirmClose { kind: String },
    /// User closed the container window
    CloseContainer,
    /// Host created a web view somewhere
    WebViewCreated,
}

/// A scripted session
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    /// Overrides the caller's configuration when present
    #[serde(default)]
    pub config: Option<Config>,
    #[serde(default = "default_primary_title")]
    pub primary_title: String,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_primary_title() -> String {
    "Main".to_string()
}

impl Scenario {
    /// Load a scenario file; `.json` files are JSON, anything else TOML
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {:?}", path))?;
        let is_json = path.extension().map(|e| e == "json").unwrap_or(false);
        Self::parse(&contents, is_json).with_context(|| format!("Failed to parse scenario {:?}", path))
    }

    pub fn parse(contents: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(contents)?)
        } else {
            Ok(toml::from_str(contents)?)
        }
    }
}

/// Final state after a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub snapshot: TabHostSnapshot,
    pub notices: Vec<String>,
    pub violations: Vec<StateViolation>,
    pub event_log: Vec<EventLogEntry>,
}

/// Play `scenario` through a fresh headless host
pub fn run(scenario: &Scenario, config: Config) -> Result<ScenarioOutcome> {
    let config = scenario.config.clone().unwrap_or(config);
    let primary_name = config.general.primary_name.clone();
    let recorder = Recorder::default();
    let main = HeadlessWindow::new(&recorder, &primary_name, &scenario.primary_title);

    let mut ctx = AppContext::new(
        config,
        Box::new(main.clone()),
        Box::new(HeadlessContainer::new(&recorder)),
        Box::new(HeadlessApp::new(&recorder)),
        Some(Box::new(HeadlessMenuMirror::new(&recorder))),
    )?;

    let mut windows: HashMap<String, HeadlessWindow> = HashMap::new();
    windows.insert(primary_name.clone(), main);

    for (n, step) in scenario.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", n + 1, step);
        apply(&mut ctx, &recorder, &mut windows, step).with_context(|| format!("Step {} failed", n + 1))?;

        for kind in recorder.take_pending_closed() {
            if kind != primary_name {
                windows.remove(&kind);
            }
            ctx.on_host_reported_closed(&kind);
        }
    }

    let host = ctx.host();
    Ok(ScenarioOutcome {
        snapshot: host.snapshot(),
        notices: recorder.notices(),
        violations: host.validate(),
        event_log: host.event_log(),
    })
}

fn apply(
    ctx: &mut AppContext,
    recorder: &Recorder,
    windows: &mut HashMap<String, HeadlessWindow>,
    step: &Step,
) -> Result<()> {
    match step {
        Step::Open { kind, title } => {
            ctx.on_window_open(kind);
            let w = windows
                .entry(kind.clone())
                .or_insert_with(|| {
                    HeadlessWindow::new(recorder, kind, title.as_deref().unwrap_or(kind.as_str()))
                })
                .clone();
            ctx.show_window(kind, Box::new(w));
        }
        Step::Hide { kind } => {
            let w = window(windows, kind)?;
            ctx.hide_window(w.id());
        }
        Step::SetTitle { kind, title } => {
            let w = window(windows, kind)?;
            ctx.set_window_title(w.id(), title);
        }
        Step::Focus { kind } => {
            let w = window(windows, kind)?;
            ctx.request_focus(w.id());
        }
        Step::Raise { kind } => {
            let w = window(windows, kind)?;
            ctx.request_raise(w.id());
        }
        Step::SelectTab { index } => ctx.on_tab_selected(*index),
        Step::CloseTab { index } => ctx.on_tab_close_requested(*index),
        Step::Key { chord } => {
            let Some(parsed) = parse_key_binding(chord) else {
                bail!("Invalid key chord {:?}", chord);
            };
            let mut event = InputEvent::KeyPress(KeyEvent::new(parsed));
            let disposition = ctx.on_tab_strip_event(&mut event);
            let shortcut = recorder.container().close_shortcut;
            if disposition == EventDisposition::Propagate && shortcut == Some(parsed) {
                ctx.on_close_shortcut();
            }
        }
        Step::RefuseClose { kind, refuse } => {
            window(windows, kind)?.set_refuse_close(*refuse);
        }
        Step::ConfirmClose { kind } => ctx.on_close_confirmation(kind),
        Step::CloseContainer => {
            ctx.on_container_close();
        }
        Step::WebViewCreated => {
            let mut web = HeadlessWebView::default();
            ctx.on_web_view_created(&mut web);
        }
    }
    Ok(())
}

fn window(windows: &HashMap<String, HeadlessWindow>, kind: &str) -> Result<HeadlessWindow> {
    match windows.get(kind) {
        Some(w) => Ok(w.clone()),
        None => bail!("No open window of kind {:?}", kind),
    }
}
