//! Configuration file support for tabhost.
//!
//! Loads settings from ~/.config/tabhost/config.toml if it exists,
//! otherwise uses sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{KeyChord, CONTROL_MASK, MOD1_MASK, MOD4_MASK, SHIFT_MASK};

/// Top-level configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub keybindings: KeybindingConfig,
    pub notices: NoticeConfig,
    pub tab_strip: TabStripStyle,
    pub capture: CaptureConfig,
}

/// Which platform adapter to select at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformChoice {
    /// Menu mirroring on macOS, default elsewhere
    Auto,
    Default,
    MenuMirror,
}

/// General settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logical name under which the primary host window is registered
    pub primary_name: String,
    pub platform: PlatformChoice,
    /// Force web views onto a native surface to avoid the black flash on tab switch
    pub fix_render_surface: bool,
}

/// Keybinding configuration (strings like "Ctrl+w")
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub close_tab: Option<String>,
}

/// User-visible notice texts
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// Shown when the close-tab chord hits the primary page.
    /// `{quit}` is replaced by the platform's quit hint.
    pub close_primary: String,
}

/// Tab position relative to the page area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabPosition {
    North,
    South,
    West,
    East,
}

/// Where long tab labels are elided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElideMode {
    Left,
    Middle,
    Right,
    None,
}

/// Appearance of the tab strip, handed to the container once at startup
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TabStripStyle {
    pub position: TabPosition,
    pub document_mode: bool,
    pub closable: bool,
    pub elide: ElideMode,
    pub expanding: bool,
    pub tab_height: u32,
    pub padding_vertical: u32,
    pub padding_horizontal: u32,
}

/// Which window kinds get captured into tabs
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Kinds that keep opening as independent windows
    pub exclude: Vec<String>,
}

impl Config {
    /// Load config from default path (~/.config/tabhost/config.toml)
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabhost")
            .join("config.toml")
    }

    /// Load config from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Parsed close-tab chord, if one is configured and valid
    pub fn close_tab_chord(&self) -> Option<KeyChord> {
        let s = self.keybindings.close_tab.as_deref()?;
        let parsed = parse_key_binding(s);
        if parsed.is_none() {
            log::warn!("Failed to parse keybinding: {}", s);
        }
        parsed
    }

    /// Whether windows of this kind should be captured into tabs
    pub fn captures(&self, kind: &str) -> bool {
        !self.capture.exclude.iter().any(|k| k == kind)
    }
}

/// Parse a key binding string like "Ctrl+Shift+w" into keysym and modifiers
pub fn parse_key_binding(s: &str) -> Option<KeyChord> {
    let parts: Vec<&str> = s.split('+').collect();
    let key_part = parts.last()?;
    if key_part.is_empty() {
        return None;
    }

    let mut modifiers: u16 = 0;
    for part in &parts[..parts.len() - 1] {
        match part.to_lowercase().as_str() {
            "mod4" | "super" | "win" | "cmd" | "meta" => modifiers |= MOD4_MASK,
            "shift" => modifiers |= SHIFT_MASK,
            "control" | "ctrl" => modifiers |= CONTROL_MASK,
            "mod1" | "alt" => modifiers |= MOD1_MASK,
            _ => {
                log::warn!("Unknown modifier: {}", part);
                return None;
            }
        }
    }

    let keysym = key_to_keysym(key_part)?;
    Some(KeyChord { keysym, modifiers })
}

/// Convert key name to keysym
pub fn key_to_keysym(key: &str) -> Option<u32> {
    let lower = key.to_lowercase();
    // Single letters and digits map straight to their Latin-1 keysym
    if lower.len() == 1 {
        let c = lower.chars().next()?;
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            return Some(c as u32);
        }
    }
    match lower.as_str() {
        "return" | "enter" => Some(0xff0d),
        "tab" => Some(0xff09),
        "escape" | "esc" => Some(0xff1b),
        "space" => Some(0x20),
        "backspace" => Some(0xff08),
        "delete" => Some(0xffff),
        "page_up" | "pageup" | "pgup" | "prior" => Some(0xff55),
        "page_down" | "pagedown" | "pgdn" | "next" => Some(0xff56),
        "left" => Some(0xff51),
        "up" => Some(0xff52),
        "right" => Some(0xff53),
        "down" => Some(0xff54),
        "home" => Some(0xff50),
        "end" => Some(0xff57),
        "f4" => Some(0xffc1),
        "[" | "bracketleft" => Some(0x5b),
        "]" | "bracketright" => Some(0x5d),
        "/" | "slash" => Some(0x2f),
        _ => {
            log::warn!("Unknown key: {}", key);
            None
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            primary_name: "main".to_string(),
            platform: PlatformChoice::Auto,
            fix_render_surface: true,
        }
    }
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            close_tab: Some("Ctrl+w".to_string()),
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            close_primary: "Main window should be closed by {quit}".to_string(),
        }
    }
}

impl Default for TabStripStyle {
    fn default() -> Self {
        Self {
            position: TabPosition::North,
            document_mode: true,
            closable: true,
            elide: ElideMode::Right,
            expanding: true,
            tab_height: 22,
            padding_vertical: 2,
            padding_horizontal: 8,
        }
    }
}
