use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::app::error::{ReelfeedError, Result};
use crate::config::Config;
use crate::domain::{
    FeedItem, FeedKind, FilterSet, Movie, Showtime, SnapshotClock, UserSummary, ZonedClock,
};
use crate::feed::{FeedController, FeedStore};
use crate::fetcher::{HttpPageFetcher, PageFetcher, RetryingFetcher};
use crate::store::{MemoryTokenStorage, SqliteTokenStorage, TokenStorage};

pub struct AppContext {
    pub config: Config,
    pub tokens: Arc<dyn TokenStorage>,
    pub fetcher: Arc<RetryingFetcher<HttpPageFetcher>>,
    pub clock: Arc<dyn SnapshotClock>,
    pub movies: Arc<FeedStore<Movie>>,
    pub showtimes: Arc<FeedStore<Showtime>>,
    pub friends: Arc<FeedStore<UserSummary>>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let tokens: Arc<dyn TokenStorage> = Arc::new(SqliteTokenStorage::new(&db_path)?);
        Self::with_tokens(config, tokens)
    }

    /// Context with tokens kept in memory only.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_tokens(config, Arc::new(MemoryTokenStorage::new()))
    }

    pub fn with_tokens(config: Config, tokens: Arc<dyn TokenStorage>) -> Result<Self> {
        let tz = config
            .timezone()
            .map_err(|e| ReelfeedError::Config(e.to_string()))?;
        let http =
            HttpPageFetcher::with_timeout(&config.api.base_url, tokens.clone(), config.timeout())?;
        let fetcher = Arc::new(RetryingFetcher::new(http, config.retry_policy()));
        let gc_after = config.gc_after();

        Ok(Self {
            tokens,
            fetcher,
            clock: Arc::new(ZonedClock::new(tz)),
            movies: Arc::new(FeedStore::with_gc_after(gc_after)),
            showtimes: Arc::new(FeedStore::with_gc_after(gc_after)),
            friends: Arc::new(FeedStore::with_gc_after(gc_after)),
            config,
        })
    }

    pub fn movies_feed(&self, filters: FilterSet) -> FeedController<Movie> {
        self.controller(FeedKind::Movies, filters, &self.movies)
    }

    pub fn showtimes_feed(&self, filters: FilterSet) -> FeedController<Showtime> {
        self.controller(FeedKind::Showtimes, filters, &self.showtimes)
    }

    pub fn friend_search(&self, filters: FilterSet) -> FeedController<UserSummary> {
        self.controller(FeedKind::FriendSearch, filters, &self.friends)
    }

    fn controller<T>(
        &self,
        feed: FeedKind,
        filters: FilterSet,
        store: &Arc<FeedStore<T>>,
    ) -> FeedController<T>
    where
        T: FeedItem + DeserializeOwned,
    {
        let fetcher: Arc<dyn PageFetcher<T>> = self.fetcher.clone();
        FeedController::new(
            feed,
            filters,
            self.config.feed.page_size,
            store.clone(),
            fetcher,
            self.clock.clone(),
        )
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ReelfeedError::Config("Could not find data directory".into()))?;
        let reelfeed_dir = data_dir.join("reelfeed");
        std::fs::create_dir_all(&reelfeed_dir)?;
        Ok(reelfeed_dir.join("reelfeed.db"))
    }
}
