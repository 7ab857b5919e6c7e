//! Snapshot-consistent offset pagination.
//!
//! ```text
//! FilterSet → FeedKey → FeedStore::begin → PageFetcher → FeedStore::complete → FeedView
//! ```
//!
//! - [`accumulator`]: identity-based page merging
//! - [`cursor`]: next offset from the pages fetched so far
//! - [`state`]: pages, offsets, flags and snapshot of one feed
//! - [`store`]: injectable cache of feed states with stale-result detection
//! - [`controller`]: drives one feed for one consumer

pub mod accumulator;
pub mod controller;
pub mod cursor;
pub mod key;
pub mod state;
pub mod store;

pub use controller::FeedController;
pub use key::FeedKey;
pub use state::{FeedState, FeedView};
pub use store::{Completion, FeedStore, FetchIntent, FetchTicket};
