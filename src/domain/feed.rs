use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The paginated lists exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Movies,
    Showtimes,
    FriendSearch,
}

impl FeedKind {
    /// Name used in cache keys and log fields.
    pub fn name(self) -> &'static str {
        match self {
            FeedKind::Movies => "movies",
            FeedKind::Showtimes => "showtimes",
            FeedKind::FriendSearch => "friend_search",
        }
    }

    /// Endpoint path relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            FeedKind::Movies => "api/movies",
            FeedKind::Showtimes => "api/showtimes",
            FeedKind::FriendSearch => "api/users/search",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" => Ok(FeedKind::Movies),
            "showtimes" => Ok(FeedKind::Showtimes),
            "friend_search" => Ok(FeedKind::FriendSearch),
            other => Err(format!("Unknown feed: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trips_through_from_str() {
        for kind in [FeedKind::Movies, FeedKind::Showtimes, FeedKind::FriendSearch] {
            assert_eq!(kind.name().parse::<FeedKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_endpoints_are_relative() {
        assert!(!FeedKind::Showtimes.endpoint().starts_with('/'));
    }
}
