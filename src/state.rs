//! State machine types and validation for tabhost.
//!
//! This module formalizes the page lifecycle and the transitions the
//! controller records. The validator in the controller checks invariants
//! that should always hold and reports them as [`StateViolation`]s.

use serde::{Deserialize, Serialize};

/// Page lifecycle states
///
/// ```text
///               ┌──────────────┐
///               │ Unregistered │
///               └──────┬───────┘
///                      │ attach()
///                      ▼
///               ┌──────────────┐
///               │   Attached   │
///               └──────┬───────┘
///                      │ selected
///                      ▼
///               ┌──────────────┐ tab switch ┌──────────────┐
///               │    Active    │◄──────────►│   Inactive   │
///               └──────┬───────┘            └──────┬───────┘
///                      │                           │
///                      └─────────────┬─────────────┘
///                                    │ host reports closed
///                                    ▼
///                             ┌──────────────┐
///                             │   Closing    │
///                             └──────┬───────┘
///                                    │ tab and name dropped
///                                    ▼
///                              (Unregistered)
/// ```
///
/// A closed page leaves no record behind; its name reads as
/// `Unregistered` again and may be attached anew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    Unregistered,
    /// Demoted and on the strip, not yet selected
    Attached,
    /// Shown in the current tab
    Active,
    /// On the strip behind another tab
    Inactive,
    /// Host confirmed the close; bookkeeping is being dropped
    Closing,
}

/// State violations that can be detected
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StateViolation {
    pub kind: ViolationKind,
    pub description: String,
}

/// Types of state violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Page appears more than once in the MRU list
    DuplicateMruEntry,
    /// MRU entry refers to a page that no longer exists
    StaleMruEntry,
    /// Name map points at a page that no longer exists
    DanglingName,
    /// Tab refers to a page that no longer exists
    OrphanedTab,
    /// Live page has no tab
    PageWithoutTab,
    /// Primary page missing from the strip
    PrimaryMissing,
    /// Recorded page state disagrees with the current tab
    StateMismatch,
}

/// State transition events that can be traced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum StateTransition {
    /// Page demoted and added to the strip
    PageAttached { name: String, window: u64 },
    /// Attach for an already-registered name only re-selected its tab
    PageReactivated { name: String },
    /// Active tab changed
    TabSwitched {
        from: Option<String>,
        to: String,
    },
    /// Page title changed and the tab label followed
    TitleChanged { name: String, title: String },
    /// Close forwarded to the page
    CloseRequested { name: String },
    /// Close-tab chord on the primary page was refused
    CloseRefused { name: String },
    /// Host confirmed the page closed and it was dropped
    PageRemoved { name: String },
    /// Container close redirected to the primary page
    ContainerCloseRedirected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_state_serialization() {
        let state = PageState::Inactive;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"inactive\"");

        let parsed: PageState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PageState::Inactive);
    }

    #[test]
    fn test_state_transition_serialization() {
        let transition = StateTransition::TabSwitched {
            from: Some("main".to_string()),
            to: "Browser".to_string(),
        };
        let json = serde_json::to_string(&transition).unwrap();
        assert!(json.contains("tab_switched"));
        assert!(json.contains("Browser"));
    }

    #[test]
    fn test_violation_serialization() {
        let v = StateViolation {
            kind: ViolationKind::StaleMruEntry,
            description: "x".to_string(),
        };
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("stale_mru_entry"));
    }
}
