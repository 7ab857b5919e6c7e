pub mod http_fetcher;
pub mod retry;

pub use http_fetcher::HttpPageFetcher;
pub use retry::{RetryPolicy, RetryingFetcher};

use async_trait::async_trait;

use crate::app::{ReelfeedError, Result};
use crate::domain::{FeedKind, FilterSet, Page, SnapshotTime};

/// Parameters of one page request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub feed: FeedKind,
    pub offset: usize,
    pub limit: usize,
    pub snapshot: SnapshotTime,
    pub filters: FilterSet,
}

impl PageRequest {
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(ReelfeedError::InvalidRequest(
                "limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch one page. Items keep the order the server returned them in.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>>;
}
