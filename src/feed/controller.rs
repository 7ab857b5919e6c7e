use std::sync::Arc;

use crate::app::{ReelfeedError, Result};
use crate::domain::{should_refetch, FeedItem, FeedKind, FilterSet, SnapshotClock};
use crate::feed::store::{Completion, FeedStore, FetchIntent};
use crate::feed::{FeedKey, FeedView};
use crate::fetcher::{PageFetcher, PageRequest};

/// Drives one feed for one consumer.
///
/// Fetches only happen through explicit calls; changing filters goes through
/// [`set_filters`](Self::set_filters), which decides whether the new filters
/// select a different feed. The controller holds a reference on its key in
/// the store for as long as it lives.
pub struct FeedController<T: FeedItem> {
    feed: FeedKind,
    filters: FilterSet,
    key: FeedKey,
    limit: usize,
    store: Arc<FeedStore<T>>,
    fetcher: Arc<dyn PageFetcher<T>>,
    clock: Arc<dyn SnapshotClock>,
}

impl<T: FeedItem> FeedController<T> {
    pub fn new(
        feed: FeedKind,
        filters: FilterSet,
        limit: usize,
        store: Arc<FeedStore<T>>,
        fetcher: Arc<dyn PageFetcher<T>>,
        clock: Arc<dyn SnapshotClock>,
    ) -> Self {
        let key = FeedKey::new(feed, &filters);
        store.retain(&key);
        Self {
            feed,
            filters,
            key,
            limit,
            store,
            fetcher,
            clock,
        }
    }

    pub fn feed(&self) -> FeedKind {
        self.feed
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn key(&self) -> &FeedKey {
        &self.key
    }

    /// Current state, or `None` before the first fetch.
    pub fn view(&self) -> Option<FeedView<T>> {
        self.store.view(&self.key)
    }

    /// Load the first page unless it is already cached or in flight.
    pub async fn load(&self) -> Result<FeedView<T>> {
        self.run(FetchIntent::Initial).await
    }

    /// Load the next page if one is known to exist and nothing is in flight.
    pub async fn load_more(&self) -> Result<FeedView<T>> {
        self.run(FetchIntent::NextPage).await
    }

    /// Pull-to-refresh: keep the first page visible, start a new snapshot
    /// and refetch from offset 0.
    pub async fn refresh(&self) -> Result<FeedView<T>> {
        self.run(FetchIntent::Refresh).await
    }

    /// Discard everything cached for this feed and fetch it from scratch.
    pub async fn refetch(&self) -> Result<FeedView<T>> {
        self.run(FetchIntent::Reload).await
    }

    /// Switch to new filters. Returns whether they selected a different feed,
    /// in which case that feed is loaded.
    pub async fn set_filters(&mut self, filters: FilterSet) -> Result<bool> {
        if !should_refetch(&self.filters, &filters) {
            self.filters = filters;
            return Ok(false);
        }

        let key = FeedKey::new(self.feed, &filters);
        tracing::debug!(
            from = %self.key.digest(),
            to = %key.digest(),
            "Filters changed"
        );
        self.store.retain(&key);
        self.store.release(&self.key);
        self.key = key;
        self.filters = filters;

        self.load().await?;
        Ok(true)
    }

    async fn run(&self, intent: FetchIntent) -> Result<FeedView<T>> {
        if let Some(ticket) = self
            .store
            .begin(&self.key, intent, self.clock.as_ref(), self.limit)
        {
            let request = PageRequest {
                feed: self.feed,
                offset: ticket.offset,
                limit: ticket.limit,
                snapshot: ticket.snapshot.clone(),
                filters: self.filters.clone(),
            };

            match self.fetcher.fetch_page(&request).await {
                Ok(page) => {
                    self.store.complete(&ticket, page);
                }
                Err(e) => {
                    // A failure from a superseded fetch says nothing about the current feed
                    if self.store.fail(&ticket, &e) == Completion::Failed {
                        return Err(e);
                    }
                }
            }
        }

        self.view()
            .ok_or_else(|| ReelfeedError::Other(format!("Feed {} was evicted", self.key)))
    }
}

impl<T: FeedItem> Drop for FeedController<T> {
    fn drop(&mut self) {
        self.store.release(&self.key);
    }
}
