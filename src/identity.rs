//! Identity comparison policy for the container window.
//!
//! The host decides "is window X focused?" by comparing the window that
//! owns keyboard focus against the window object it expects to be a
//! separate top-level. With every page embedded, the focus owner is always
//! the container, so those checks would all fail. The container therefore
//! compares equal to itself and to whichever page is the active tab; any
//! other comparison is left to the other window.
//!
//! Hosts that can be changed should call [`current_focus_target`] instead.

use crate::host::HostWindow;
use crate::types::WindowId;

/// Outcome of comparing the container against another window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// The other window is the container itself
    Container,
    /// The other window is the page shown in the active tab
    ActivePage,
    /// Neither; the other window's own comparison decided
    Deferred(bool),
}

impl Identity {
    pub fn is_equal(self) -> bool {
        match self {
            Identity::Container | Identity::ActivePage => true,
            Identity::Deferred(eq) => eq,
        }
    }
}

/// The three-case comparison policy
#[derive(Debug, Clone, Copy)]
pub struct ComparisonPolicy {
    pub container: WindowId,
    pub active_page: Option<WindowId>,
}

impl ComparisonPolicy {
    pub fn compare(&self, other: &dyn HostWindow) -> Identity {
        self.compare_id(other.id(), || other.compare_with(self.container))
    }

    /// Compare against a bare window id, with `fallback` supplying the other
    /// side's own comparison.
    pub fn compare_id(&self, other: WindowId, fallback: impl FnOnce() -> Option<bool>) -> Identity {
        if other == self.container {
            return Identity::Container;
        }
        if Some(other) == self.active_page {
            return Identity::ActivePage;
        }
        Identity::Deferred(fallback().unwrap_or(false))
    }

    pub fn is_eq(&self, other: &dyn HostWindow) -> bool {
        self.compare(other).is_equal()
    }

    pub fn is_ne(&self, other: &dyn HostWindow) -> bool {
        !self.is_eq(other)
    }
}

/// The window the host should treat as focused when the container has focus
pub fn current_focus_target(policy: &ComparisonPolicy) -> WindowId {
    policy.active_page.unwrap_or(policy.container)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: WindowId = WindowId(1);
    const ACTIVE: WindowId = WindowId(2);
    const OTHER: WindowId = WindowId(3);

    fn policy() -> ComparisonPolicy {
        ComparisonPolicy {
            container: CONTAINER,
            active_page: Some(ACTIVE),
        }
    }

    #[test]
    fn test_three_cases() {
        let p = policy();
        assert_eq!(p.compare_id(CONTAINER, || None), Identity::Container);
        assert_eq!(p.compare_id(ACTIVE, || None), Identity::ActivePage);
        assert_eq!(p.compare_id(OTHER, || None), Identity::Deferred(false));
        assert_eq!(p.compare_id(OTHER, || Some(true)), Identity::Deferred(true));
    }

    #[test]
    fn test_fallback_not_consulted_for_known_cases() {
        let p = policy();
        let id = p.compare_id(ACTIVE, || panic!("fallback should not run"));
        assert!(id.is_equal());
    }

    #[test]
    fn test_focus_target() {
        assert_eq!(current_focus_target(&policy()), ACTIVE);
        let empty = ComparisonPolicy {
            container: CONTAINER,
            active_page: None,
        };
        assert_eq!(current_focus_target(&empty), CONTAINER);
    }
}
