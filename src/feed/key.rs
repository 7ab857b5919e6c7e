use std::fmt;

use sha2::{Digest, Sha256};

use crate::domain::{build_key, FeedKind, FilterSet};

/// Identifies one cached feed: the feed name plus its canonical filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeedKey(String);

impl FeedKey {
    pub fn new(feed: FeedKind, filters: &FilterSet) -> Self {
        Self(format!("{}:{}", feed.name(), build_key(filters)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short stable digest for log fields.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(12);
        digest
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
