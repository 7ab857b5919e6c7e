use serde::{Deserialize, Serialize};

/// One fetched page.
///
/// `items` may shrink when the page is merged into a feed and duplicates are
/// dropped; `fetched_len` keeps the count the server returned, which is what
/// the cursor advances by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub fetched_len: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        let fetched_len = items.len();
        Self { items, fetched_len }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Visible items after deduplication.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Vec<T>> for Page<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}
