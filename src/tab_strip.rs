//! Tab strip model.
//!
//! The ordered list of tabs and the current index. The container's visible
//! tab bar mirrors this; tab indices are always derived from here by page
//! identity and never stored elsewhere.

use crate::types::PageId;

/// One tab on the strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub page: PageId,
    pub label: String,
}

/// Ordered tabs plus the current selection
#[derive(Debug, Default)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    current: Option<usize>,
}

impl TabStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_page(&self) -> Option<PageId> {
        self.current.and_then(|i| self.page_at(i))
    }

    pub fn page_at(&self, index: usize) -> Option<PageId> {
        self.tabs.get(index).map(|t| t.page)
    }

    pub fn index_of(&self, page: PageId) -> Option<usize> {
        self.tabs.iter().position(|t| t.page == page)
    }

    /// Append a tab and return its index.
    ///
    /// The first tab added to an empty strip becomes current.
    pub fn add(&mut self, page: PageId, label: &str) -> usize {
        self.tabs.push(Tab {
            page,
            label: label.to_string(),
        });
        if self.current.is_none() {
            self.current = Some(0);
        }
        self.tabs.len() - 1
    }

    /// Select a tab. Returns true if the current page changed.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.current == Some(index) {
            return false;
        }
        self.current = Some(index);
        true
    }

    pub fn set_label(&mut self, index: usize, label: &str) -> bool {
        match self.tabs.get_mut(index) {
            Some(tab) => {
                tab.label = label.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a tab. Returns the removed tab and whether the current page
    /// changed as a result.
    pub fn remove(&mut self, index: usize) -> Option<(Tab, bool)> {
        if index >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(index);
        let mut changed = false;
        self.current = match self.current {
            Some(_) if self.tabs.is_empty() => {
                changed = true;
                None
            }
            Some(cur) if cur > index => Some(cur - 1),
            Some(cur) if cur == index => {
                // Neighbour to the right slides into place, or the new last tab
                changed = true;
                Some(cur.min(self.tabs.len() - 1))
            }
            other => other,
        };
        Some((tab, changed))
    }
}
