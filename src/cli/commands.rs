use crate::app::{AppContext, ReelfeedError, Result};
use crate::domain::{FeedItem, FilterSet, Movie, Range, Showtime, ShowtimeStatus, UserSummary};
use crate::feed::{FeedController, FeedView};
use crate::store::AUTH_TOKEN_KEY;

pub async fn login(ctx: &AppContext, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ReelfeedError::Other("Token must not be empty".into()));
    }
    ctx.tokens.set(AUTH_TOKEN_KEY, token).await?;
    println!("Logged in");
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.tokens.remove(AUTH_TOKEN_KEY).await?;
    println!("Logged out");
    Ok(())
}

pub fn movie_filters(query: Option<&str>, watchlist: bool) -> FilterSet {
    let mut filters = FilterSet::new().flag("watchlistOnly", watchlist);
    if let Some(query) = query {
        filters = filters.text("query", query);
    }
    filters
}

pub struct ShowtimeFilters {
    pub query: Option<String>,
    pub watchlist: bool,
    pub cinemas: Vec<String>,
    pub days: Vec<String>,
    pub time_ranges: Vec<Range>,
    pub statuses: Vec<ShowtimeStatus>,
}

impl ShowtimeFilters {
    pub fn to_filter_set(&self) -> FilterSet {
        let mut filters = movie_filters(self.query.as_deref(), self.watchlist)
            .set("selectedCinemaIds", self.cinemas.iter().cloned())
            .set("days", self.days.iter().cloned())
            .set("selectedStatuses", self.statuses.iter().map(|s| s.as_str()));
        if !self.time_ranges.is_empty() {
            filters = filters.ranges("timeRanges", self.time_ranges.clone());
        }
        filters
    }
}

pub async fn list_movies(
    ctx: &AppContext,
    query: Option<&str>,
    watchlist: bool,
    pages: usize,
) -> Result<()> {
    let feed = ctx.movies_feed(movie_filters(query, watchlist));
    let view = report(ctx, load_pages(&feed, pages, false).await).await?;

    if let Some(view) = view {
        print_items(&view, |movie: &Movie| {
            let marker = if movie.is_on_watchlist { "*" } else { " " };
            format!("{} {}", marker, movie.display_title())
        });
    }
    Ok(())
}

pub async fn list_showtimes(
    ctx: &AppContext,
    filters: &ShowtimeFilters,
    pages: usize,
    refresh: bool,
) -> Result<()> {
    let feed = ctx.showtimes_feed(filters.to_filter_set());
    let view = report(ctx, load_pages(&feed, pages, refresh).await).await?;

    if let Some(view) = view {
        print_items(&view, |showtime: &Showtime| {
            let status = showtime.user_status.map(|s| s.as_str()).unwrap_or("");
            format!(
                "{} {} @ {} {} ({} friends)",
                showtime.datetime.format("%a %d.%m %H:%M"),
                showtime.movie_title,
                showtime.cinema_name,
                status,
                showtime.friend_count()
            )
        });
    }
    Ok(())
}

pub async fn search_friends(ctx: &AppContext, query: &str, pages: usize) -> Result<()> {
    let feed = ctx.friend_search(FilterSet::new().text("query", query));
    let view = report(ctx, load_pages(&feed, pages, false).await).await?;

    if let Some(view) = view {
        print_items(&view, |user: &UserSummary| {
            let relation = if user.is_friend {
                "friend"
            } else if user.request_pending {
                "pending"
            } else {
                ""
            };
            format!("{} {}", user.display_name(), relation)
        });
    }
    Ok(())
}

/// Load the first page, optionally refresh it, then follow the cursor until
/// `pages` pages are loaded or the feed is exhausted.
pub async fn load_pages<T: FeedItem>(
    feed: &FeedController<T>,
    pages: usize,
    refresh: bool,
) -> Result<FeedView<T>> {
    let mut view = feed.load().await?;
    if refresh {
        view = feed.refresh().await?;
    }
    while view.has_next_page && view.page_count() < pages {
        view = feed.load_more().await?;
    }
    Ok(view)
}

/// Turn authorization failures into user-facing messages. A rejected token
/// is removed from storage.
async fn report<T>(
    ctx: &AppContext,
    result: Result<FeedView<T>>,
) -> Result<Option<FeedView<T>>> {
    match result {
        Ok(view) => Ok(Some(view)),
        Err(ReelfeedError::Unauthorized) => {
            ctx.tokens.remove(AUTH_TOKEN_KEY).await?;
            tracing::info!("Cleared rejected token");
            eprintln!("Session expired. Log in again with `reelfeed login <token>`.");
            Ok(None)
        }
        Err(ReelfeedError::Forbidden) => {
            eprintln!("You don't have access to this feed.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_items<T>(view: &FeedView<T>, line: impl Fn(&T) -> String) {
    if view.items.is_empty() {
        println!("Nothing found");
        return;
    }

    for item in &view.items {
        println!("{}", line(item).trim_end());
    }

    if view.has_next_page {
        println!("... more available (use --pages)");
    }
}
