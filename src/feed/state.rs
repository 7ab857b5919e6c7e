use serde::Serialize;

use crate::domain::{FeedItem, Page, SnapshotTime};
use crate::feed::{accumulator, cursor};

/// Accumulated pagination state of one feed.
///
/// `page_params[i]` is the offset `pages[i]` was requested at. Both vectors
/// always have the same length and offsets strictly increase.
#[derive(Debug, Clone)]
pub struct FeedState<T> {
    pages: Vec<Page<T>>,
    page_params: Vec<usize>,
    has_next_page: bool,
    is_fetching: bool,
    error: Option<String>,
    snapshot: SnapshotTime,
    generation: u64,
    limit: usize,
}

impl<T: FeedItem> FeedState<T> {
    pub fn new(snapshot: SnapshotTime, limit: usize) -> Self {
        Self {
            pages: Vec::new(),
            page_params: Vec::new(),
            has_next_page: false,
            is_fetching: false,
            error: None,
            snapshot,
            generation: 0,
            limit,
        }
    }

    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    pub fn page_params(&self) -> &[usize] {
        &self.page_params
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> &SnapshotTime {
        &self.snapshot
    }

    /// Bumped by every reset; fetches started under an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_loaded(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Flattened, duplicate-free items in first-seen order.
    pub fn items(&self) -> Vec<T> {
        accumulator::flatten(&self.pages)
    }

    /// Offset of the next page, if the last page was full.
    pub fn next_offset(&self) -> Option<usize> {
        let last = self.pages.last()?;
        cursor::next_offset(last, &self.pages, self.limit)
    }

    pub(crate) fn start_fetch(&mut self) {
        self.is_fetching = true;
    }

    /// Replace every page with a freshly fetched first page.
    pub fn apply_first_page(&mut self, page: Page<T>) {
        self.pages = accumulator::merge(Vec::new(), page);
        self.page_params = vec![0];
        self.finish_fetch();
    }

    /// Append the page fetched at `offset`.
    pub fn apply_next_page(&mut self, offset: usize, page: Page<T>) {
        debug_assert!(
            self.page_params.last().is_none_or(|last| offset > *last),
            "page offsets must strictly increase"
        );
        let pages = std::mem::take(&mut self.pages);
        self.pages = accumulator::merge(pages, page);
        self.page_params.push(offset);
        self.finish_fetch();
    }

    fn finish_fetch(&mut self) {
        self.has_next_page = self.next_offset().is_some();
        self.is_fetching = false;
        self.error = None;
    }

    /// Record a failed fetch. Accumulated pages are kept.
    pub fn fail(&mut self, error: String) {
        self.is_fetching = false;
        self.error = Some(error);
    }

    /// Stop tracking an in-flight fetch without recording an outcome.
    pub(crate) fn abandon_fetch(&mut self) {
        self.is_fetching = false;
    }

    /// Truncate to the first page and start a new snapshot session.
    ///
    /// The first page stays visible until its replacement arrives; in-flight
    /// fetches from the previous generation will be discarded.
    pub fn reset(&mut self, snapshot: SnapshotTime) {
        self.pages.truncate(1);
        self.page_params.truncate(1);
        self.has_next_page = self.next_offset().is_some();
        self.begin_generation(snapshot);
    }

    /// Drop every page and start a new snapshot session.
    pub fn clear(&mut self, snapshot: SnapshotTime) {
        self.pages.clear();
        self.page_params.clear();
        self.has_next_page = false;
        self.begin_generation(snapshot);
    }

    fn begin_generation(&mut self, snapshot: SnapshotTime) {
        self.snapshot = snapshot;
        self.generation += 1;
        self.is_fetching = false;
        self.error = None;
    }

    pub fn view(&self) -> FeedView<T> {
        FeedView {
            items: self.items(),
            page_params: self.page_params.clone(),
            has_next_page: self.has_next_page,
            is_fetching: self.is_fetching,
            error: self.error.clone(),
            snapshot: self.snapshot.clone(),
        }
    }
}

/// Read-only copy of a feed handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView<T> {
    pub items: Vec<T>,
    pub page_params: Vec<usize>,
    pub has_next_page: bool,
    pub is_fetching: bool,
    pub error: Option<String>,
    pub snapshot: SnapshotTime,
}

impl<T> FeedView<T> {
    pub fn page_count(&self) -> usize {
        self.page_params.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use chrono::NaiveDate;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(i64);

    impl FeedItem for Item {
        fn item_id(&self) -> ItemId {
            ItemId::Int(self.0)
        }
    }

    fn snapshot(minute: u32) -> SnapshotTime {
        SnapshotTime::from_naive(
            NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(20, minute, 0)
                .unwrap(),
        )
    }

    fn page(ids: &[i64]) -> Page<Item> {
        Page::new(ids.iter().copied().map(Item).collect())
    }

    fn ids(state: &FeedState<Item>) -> Vec<i64> {
        state.items().iter().map(|i| i.0).collect()
    }

    #[test]
    fn test_new_state_is_empty() {
        let state: FeedState<Item> = FeedState::new(snapshot(0), 20);
        assert!(!state.is_loaded());
        assert!(!state.has_next_page());
        assert_eq!(state.next_offset(), None);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn test_pages_and_params_stay_parallel() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.apply_next_page(2, page(&[2, 3]));
        state.apply_next_page(4, page(&[4]));

        assert_eq!(state.pages().len(), state.page_params().len());
        assert_eq!(state.page_params(), &[0, 2, 4]);
        assert_eq!(ids(&state), vec![1, 2, 3, 4]);
        assert!(!state.has_next_page());
    }

    #[test]
    fn test_reset_keeps_only_first_page() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.apply_next_page(2, page(&[3, 4]));
        state.apply_next_page(4, page(&[5, 6]));

        state.reset(snapshot(5));

        assert_eq!(state.pages().len(), 1);
        assert_eq!(state.page_params(), &[0]);
        assert_eq!(ids(&state), vec![1, 2]);
        assert_eq!(state.snapshot(), &snapshot(5));
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_first_page_after_reset_replaces_retained_page() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.apply_next_page(2, page(&[3, 4]));
        state.reset(snapshot(5));

        state.apply_first_page(page(&[9, 1]));

        assert_eq!(ids(&state), vec![9, 1]);
        assert_eq!(state.page_params(), &[0]);
        assert!(state.has_next_page());
    }

    #[test]
    fn test_failure_keeps_pages() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.start_fetch();
        state.fail("Server responded with HTTP 500".into());

        assert_eq!(ids(&state), vec![1, 2]);
        assert!(!state.is_fetching());
        assert!(state.has_next_page());
        assert_eq!(state.error(), Some("Server responded with HTTP 500"));
    }

    #[test]
    fn test_success_clears_error() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.fail("boom".into());
        state.apply_next_page(2, page(&[3]));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.clear(snapshot(1));
        assert!(!state.is_loaded());
        assert!(state.page_params().is_empty());
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_view_reports_page_count() {
        let mut state = FeedState::new(snapshot(0), 2);
        state.apply_first_page(page(&[1, 2]));
        state.apply_next_page(2, page(&[3, 4]));
        let view = state.view();
        assert_eq!(view.page_count(), 2);
        assert_eq!(view.items.len(), 4);
        assert!(view.has_next_page);
    }
}
