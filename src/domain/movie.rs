use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{FeedItem, ItemId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub is_on_watchlist: bool,
    #[serde(default)]
    pub showtime_count: Option<u32>,
}

impl Movie {
    pub fn display_title(&self) -> String {
        match self.release_date {
            Some(date) => format!("{} ({})", self.title, date.format("%Y")),
            None => self.title.clone(),
        }
    }
}

impl FeedItem for Movie {
    fn item_id(&self) -> ItemId {
        ItemId::Int(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_payload() {
        let movie: Movie = serde_json::from_str(r#"{"id": 3, "title": "Alien"}"#).unwrap();
        assert_eq!(movie.item_id(), ItemId::Int(3));
        assert!(!movie.is_on_watchlist);
        assert_eq!(movie.display_title(), "Alien");
    }

    #[test]
    fn test_display_title_with_year() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 3, "title": "Alien", "releaseDate": "1979-05-25", "isOnWatchlist": true}"#,
        )
        .unwrap();
        assert_eq!(movie.display_title(), "Alien (1979)");
        assert!(movie.is_on_watchlist);
    }
}
