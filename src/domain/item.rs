use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an element in a feed.
///
/// Movies and showtimes are keyed by integers, users by opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Str(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId::Str(id)
    }
}

/// An identity-bearing element of a feed.
///
/// The pagination layer never looks past [`FeedItem::item_id`].
pub trait FeedItem: Clone + Send + Sync + 'static {
    fn item_id(&self) -> ItemId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_and_str_ids_differ() {
        assert_ne!(ItemId::from(1), ItemId::from("1"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemId::from(42).to_string(), "42");
        assert_eq!(ItemId::from("u-7").to_string(), "u-7");
    }

    #[test]
    fn test_untagged_deserialize() {
        let int: ItemId = serde_json::from_str("17").unwrap();
        let string: ItemId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(int, ItemId::Int(17));
        assert_eq!(string, ItemId::Str("abc".into()));
    }
}
