use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelfeed::app::AppContext;
use reelfeed::cli::commands::{self, ShowtimeFilters};
use reelfeed::cli::{Cli, Commands};
use reelfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(limit) = cli.limit {
        anyhow::ensure!(limit > 0, "--limit must be greater than zero");
        config.feed.page_size = limit;
    }
    let ctx = AppContext::new(config, None)?;

    match cli.command {
        Commands::Login { token } => {
            commands::login(&ctx, &token).await?;
        }
        Commands::Logout => {
            commands::logout(&ctx).await?;
        }
        Commands::Movies {
            query,
            watchlist,
            paging,
        } => {
            commands::list_movies(&ctx, query.as_deref(), watchlist, paging.pages).await?;
        }
        Commands::Showtimes {
            query,
            watchlist,
            cinemas,
            days,
            time_ranges,
            statuses,
            paging,
            refresh,
        } => {
            let filters = ShowtimeFilters {
                query,
                watchlist,
                cinemas,
                days,
                time_ranges,
                statuses,
            };
            commands::list_showtimes(&ctx, &filters, paging.pages, refresh).await?;
        }
        Commands::Friends { query, paging } => {
            commands::search_friends(&ctx, &query, paging.pages).await?;
        }
    }

    Ok(())
}
