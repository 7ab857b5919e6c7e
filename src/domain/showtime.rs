use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{FeedItem, ItemId, ShowtimeStatus, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: i64,
    pub movie_id: i64,
    pub movie_title: String,
    pub cinema_id: i64,
    pub cinema_name: String,
    /// Local start time in the cinema's timezone.
    pub datetime: NaiveDateTime,
    #[serde(default)]
    pub user_status: Option<ShowtimeStatus>,
    #[serde(default)]
    pub friends_going: Vec<UserSummary>,
    #[serde(default)]
    pub friends_interested: Vec<UserSummary>,
}

impl Showtime {
    /// Number of friends with any plan for this showtime.
    pub fn friend_count(&self) -> usize {
        self.friends_going.len() + self.friends_interested.len()
    }
}

impl FeedItem for Showtime {
    fn item_id(&self) -> ItemId {
        ItemId::Int(self.id)
    }
}
