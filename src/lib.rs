//! # reelfeed
//!
//! Client for paginated movie, showtime and friend-search feeds.
//!
//! ## Architecture
//!
//! Every feed follows the same pipeline:
//!
//! ```text
//! FilterSet → FeedKey → PageFetcher (offset, limit, snapshot) → merge → FeedView
//! ```
//!
//! Pages of one scroll session share a snapshot time so the backend evaluates
//! "now" identically for each of them. Items are deduplicated by identity
//! across all pages; the cursor advances by the number of items the server
//! returned, not the number that survived deduplication.
//!
//! ## Quick Start
//!
//! ```bash
//! # Store a token
//! reelfeed login <token>
//!
//! # First three pages of tonight's showtimes on your watchlist
//! reelfeed showtimes --watchlist --time-range 18:00-23:59 --pages 3
//!
//! # Find friends
//! reelfeed friends anna
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Config file loading
//! - [`domain`]: Items, filters, snapshot clocks and pages
//! - [`feed`]: Pagination state, feed store and controllers
//! - [`fetcher`]: Page fetching and retry
//! - [`store`]: Token persistence

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// token storage, fetcher, clock and one feed store per item type.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/reelfeed/config.toml`, supporting:
/// - API base URL and timeout
/// - Page size, cache lifetime and snapshot time zone
/// - Retry attempts and backoff
pub mod config;

/// Command-line interface using clap.
///
/// Defines the CLI structure and subcommands:
/// - `login <token>` / `logout` - Manage the stored token
/// - `movies` - List movies
/// - `showtimes` - List showtimes with cinema, day, time and status filters
/// - `friends <query>` - Search users
pub mod cli;

/// Core domain models.
///
/// - [`FilterSet`](domain::FilterSet): Filter values with canonical cache keys
/// - [`SnapshotClock`](domain::SnapshotClock): Session-fixed timestamps
/// - [`Page`](domain::Page): One fetched page
/// - [`Movie`](domain::Movie), [`Showtime`](domain::Showtime),
///   [`UserSummary`](domain::UserSummary): Feed items
pub mod domain;

/// Snapshot-consistent offset pagination.
///
/// - [`FeedStore`](feed::FeedStore): Shared cache of feed states
/// - [`FeedController`](feed::FeedController): Explicit load, load-more, refresh and refetch
pub mod feed;

/// Page fetching.
///
/// - [`PageFetcher`](fetcher::PageFetcher): Async trait for fetching one page
/// - [`HttpPageFetcher`](fetcher::HttpPageFetcher): reqwest-based implementation
/// - [`RetryingFetcher`](fetcher::RetryingFetcher): Bounded retry that never retries 401/403
pub mod fetcher;

/// Token persistence.
///
/// - [`TokenStorage`](store::TokenStorage): Async key/value trait
/// - [`SqliteTokenStorage`](store::SqliteTokenStorage): SQLite implementation
pub mod store;
