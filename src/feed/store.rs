//! Cache of feed states keyed by feed name and canonical filters.
//!
//! The lock is only held for state transitions, never across a network call:
//! callers [`begin`](FeedStore::begin) a fetch, await it, then hand the result
//! back through [`complete`](FeedStore::complete) or [`fail`](FeedStore::fail).
//! A ticket only applies while its generation is current, so responses that
//! belong to a snapshot superseded by a reset are dropped on arrival.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::app::ReelfeedError;
use crate::domain::{FeedItem, Page, SnapshotClock, SnapshotTime};
use crate::feed::state::{FeedState, FeedView};
use crate::feed::FeedKey;

pub const DEFAULT_GC_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchIntent {
    /// First page of a feed that has nothing loaded yet.
    Initial,
    /// The page after the last one loaded.
    NextPage,
    /// Truncate to the first page and refetch it under a new snapshot.
    Refresh,
    /// Drop all pages and refetch the first one under a new snapshot.
    Reload,
}

/// Permission to run one fetch, issued by [`FeedStore::begin`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub key: FeedKey,
    pub intent: FetchIntent,
    pub offset: usize,
    pub limit: usize,
    pub snapshot: SnapshotTime,
    epoch: u64,
    generation: u64,
    page_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// The ticket was superseded or its entry evicted; nothing changed.
    Discarded,
}

struct Entry<T> {
    /// Created by the first fetch; consumers may register before that.
    state: Option<FeedState<T>>,
    /// Distinguishes a state from one recreated under the same key after
    /// eviction or invalidation, whose generations start over.
    epoch: u64,
    refs: usize,
    idle_since: Option<Instant>,
}

impl<T> Entry<T> {
    fn idle() -> Self {
        Self {
            state: None,
            epoch: 0,
            refs: 0,
            idle_since: Some(Instant::now()),
        }
    }
}

pub struct FeedStore<T> {
    entries: Mutex<HashMap<FeedKey, Entry<T>>>,
    gc_after: Duration,
    next_epoch: AtomicU64,
}

impl<T: FeedItem> FeedStore<T> {
    pub fn new() -> Self {
        Self::with_gc_after(DEFAULT_GC_AFTER)
    }

    pub fn with_gc_after(gc_after: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            gc_after,
            next_epoch: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<FeedKey, Entry<T>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a fetch for `key`, creating its state if needed.
    ///
    /// Returns `None` when there is nothing to fetch: the first page is
    /// already loaded or in flight, or no next page is known to exist.
    /// `limit` only applies when the state is created.
    pub fn begin(
        &self,
        key: &FeedKey,
        intent: FetchIntent,
        clock: &dyn SnapshotClock,
        limit: usize,
    ) -> Option<FetchTicket> {
        let now = Instant::now();
        let mut entries = self.lock();
        self.sweep(&mut entries, now);
        let entry = entries.entry(key.clone()).or_insert_with(Entry::idle);
        if entry.refs == 0 {
            entry.idle_since = Some(now);
        }
        if entry.state.is_none() {
            entry.epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        }
        let epoch = entry.epoch;
        let state = entry
            .state
            .get_or_insert_with(|| FeedState::new(clock.now(), limit));

        let (offset, page_index) = match intent {
            FetchIntent::Initial => {
                if state.is_loaded() || state.is_fetching() {
                    return None;
                }
                (0, 0)
            }
            FetchIntent::NextPage => {
                if state.is_fetching() || !state.has_next_page() {
                    return None;
                }
                (state.next_offset()?, state.pages().len())
            }
            FetchIntent::Refresh => {
                state.reset(clock.now());
                (0, 0)
            }
            FetchIntent::Reload => {
                state.clear(clock.now());
                (0, 0)
            }
        };

        state.start_fetch();
        tracing::debug!(
            key = %key.digest(),
            ?intent,
            offset,
            snapshot = %state.snapshot(),
            "Fetch started"
        );

        Some(FetchTicket {
            key: key.clone(),
            intent,
            offset,
            limit: state.limit(),
            snapshot: state.snapshot().clone(),
            epoch,
            generation: state.generation(),
            page_index,
        })
    }

    /// Merge a fetched page, unless the ticket has been superseded.
    pub fn complete(&self, ticket: &FetchTicket, page: Page<T>) -> Completion {
        let mut entries = self.lock();
        let Some(state) = current_state(&mut entries, ticket) else {
            return Completion::Discarded;
        };

        match ticket.intent {
            FetchIntent::Initial | FetchIntent::Refresh | FetchIntent::Reload => {
                state.apply_first_page(page);
            }
            FetchIntent::NextPage => {
                if state.pages().len() != ticket.page_index {
                    tracing::debug!(
                        key = %ticket.key.digest(),
                        offset = ticket.offset,
                        "Discarding out-of-order page"
                    );
                    state.abandon_fetch();
                    return Completion::Discarded;
                }
                state.apply_next_page(ticket.offset, page);
            }
        }

        tracing::debug!(
            key = %ticket.key.digest(),
            offset = ticket.offset,
            has_next_page = state.has_next_page(),
            "Page applied"
        );
        Completion::Applied
    }

    /// Record a failed fetch. Pages already accumulated are kept.
    pub fn fail(&self, ticket: &FetchTicket, error: &ReelfeedError) -> Completion {
        let mut entries = self.lock();
        let Some(state) = current_state(&mut entries, ticket) else {
            return Completion::Discarded;
        };
        tracing::warn!(
            key = %ticket.key.digest(),
            offset = ticket.offset,
            error = %error,
            "Page fetch failed"
        );
        state.fail(error.to_string());
        Completion::Failed
    }

    pub fn view(&self, key: &FeedKey) -> Option<FeedView<T>> {
        self.with_state(key, FeedState::view)
    }

    /// Run `f` against the state of `key`, if one has been created.
    pub fn with_state<R>(&self, key: &FeedKey, f: impl FnOnce(&FeedState<T>) -> R) -> Option<R> {
        self.lock()
            .get(key)
            .and_then(|entry| entry.state.as_ref())
            .map(f)
    }

    /// Register a consumer of `key`. Referenced entries are never collected.
    pub fn retain(&self, key: &FeedKey) {
        let mut entries = self.lock();
        self.sweep(&mut entries, Instant::now());
        let entry = entries.entry(key.clone()).or_insert_with(Entry::idle);
        entry.refs += 1;
        entry.idle_since = None;
    }

    /// Drop a consumer of `key`; the entry becomes collectable when none remain.
    pub fn release(&self, key: &FeedKey) {
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.refs = entry.refs.saturating_sub(1);
            if entry.refs == 0 {
                entry.idle_since = Some(Instant::now());
            }
        }
    }

    /// Remove the cached state of `key`; in-flight tickets become stale.
    ///
    /// Registered consumers stay registered.
    pub fn invalidate(&self, key: &FeedKey) -> bool {
        let mut entries = self.lock();
        match entries.get_mut(key) {
            Some(entry) => entry.state.take().is_some(),
            None => false,
        }
    }

    /// Evict unreferenced entries idle for longer than the inactivity window.
    ///
    /// Also runs whenever a fetch begins or a consumer registers.
    pub fn collect_garbage(&self) -> usize {
        self.collect_garbage_at(Instant::now())
    }

    pub fn collect_garbage_at(&self, now: Instant) -> usize {
        self.sweep(&mut self.lock(), now)
    }

    fn sweep(&self, entries: &mut HashMap<FeedKey, Entry<T>>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| match entry.idle_since {
            Some(since) => now.saturating_duration_since(since) < self.gc_after,
            None => true,
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle feeds", evicted);
        }
        evicted
    }

    /// Number of feeds with a cached state.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.state.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &FeedKey) -> bool {
        self.with_state(key, |_| ()).is_some()
    }
}

impl<T: FeedItem> Default for FeedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn current_state<'a, T: FeedItem>(
    entries: &'a mut HashMap<FeedKey, Entry<T>>,
    ticket: &FetchTicket,
) -> Option<&'a mut FeedState<T>> {
    let entry = entries.get_mut(&ticket.key)?;
    if entry.epoch != ticket.epoch {
        return None;
    }
    let state = entry.state.as_mut()?;
    if state.generation() != ticket.generation {
        tracing::debug!(
            key = %ticket.key.digest(),
            snapshot = %ticket.snapshot,
            "Discarding page from superseded snapshot"
        );
        return None;
    }
    Some(state)
}
