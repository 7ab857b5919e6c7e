use serde::{Deserialize, Serialize};

use crate::domain::{FeedItem, ItemId};

/// A user as returned by friend search and embedded in showtimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_friend: bool,
    #[serde(default)]
    pub request_pending: bool,
}

impl UserSummary {
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(&self.id)
    }
}

impl FeedItem for UserSummary {
    fn item_id(&self) -> ItemId {
        ItemId::Str(self.id.clone())
    }
}
