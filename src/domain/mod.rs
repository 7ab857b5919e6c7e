pub mod feed;
pub mod filter;
pub mod item;
pub mod movie;
pub mod page;
pub mod showtime;
pub mod snapshot;
pub mod state;
pub mod user;

pub use feed::FeedKind;
pub use filter::{build_key, should_refetch, CacheKey, FilterSet, FilterValue, Range};
pub use item::{FeedItem, ItemId};
pub use movie::Movie;
pub use page::Page;
pub use showtime::Showtime;
pub use snapshot::{ManualClock, SnapshotClock, SnapshotTime, ZonedClock};
pub use state::ShowtimeStatus;
pub use user::UserSummary;
