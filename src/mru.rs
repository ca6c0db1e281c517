//! Most-recently-used ordering of pages.

use crate::types::PageId;

/// Pages in most-recent-first order, each present at most once.
#[derive(Debug, Default, Clone)]
pub struct MruList {
    pages: Vec<PageId>,
}

impl MruList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `page` to the front, dropping any earlier occurrence.
    pub fn touch(&mut self, page: PageId) {
        self.remove(page);
        self.pages.insert(0, page);
    }

    /// Remove a page. Absent pages are ignored.
    pub fn remove(&mut self, page: PageId) {
        self.pages.retain(|&p| p != page);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageId> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[PageId] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
