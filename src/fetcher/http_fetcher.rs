use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::app::{ReelfeedError, Result};
use crate::domain::Page;
use crate::fetcher::{PageFetcher, PageRequest};
use crate::store::{TokenStorage, AUTH_TOKEN_KEY};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches feed pages from the showtime backend.
pub struct HttpPageFetcher {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStorage>,
}

impl HttpPageFetcher {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStorage>) -> Result<Self> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        tokens: Arc<dyn TokenStorage>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("reelfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url)?,
            tokens,
        })
    }

    /// Full request URL including pagination, snapshot and filter parameters.
    pub fn request_url(&self, request: &PageRequest) -> Result<Url> {
        let mut url = self.base_url.join(request.feed.endpoint())?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("offset", &request.offset.to_string())
                .append_pair("limit", &request.limit.to_string())
                .append_pair("snapshotTime", request.snapshot.as_str());
            for (name, value) in request.filters.to_query_pairs() {
                query.append_pair(&name, &value);
            }
        }
        Ok(url)
    }
}

// Url::join drops the last path segment unless it ends with a slash
fn normalize_base(base_url: &str) -> Result<Url> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{}/", base_url))?)
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>> {
        request.validate()?;
        let url = self.request_url(request)?;
        tracing::debug!(
            feed = %request.feed,
            offset = request.offset,
            limit = request.limit,
            snapshot = %request.snapshot,
            "Fetching page"
        );

        let mut builder = self.client.get(url);
        if let Some(token) = self.tokens.get(AUTH_TOKEN_KEY).await? {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(ReelfeedError::Unauthorized),
            StatusCode::FORBIDDEN => return Err(ReelfeedError::Forbidden),
            status if !status.is_success() => {
                return Err(ReelfeedError::Status {
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let body = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&body)?;

        if items.len() > request.limit {
            tracing::warn!(
                "{} returned {} items for limit {}",
                request.feed,
                items.len(),
                request.limit
            );
        }

        Ok(Page::new(items))
    }
}
