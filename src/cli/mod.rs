pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Range, ShowtimeStatus};

#[derive(Parser)]
#[command(name = "reelfeed")]
#[command(about = "Browse movie, showtime and friend feeds", long_about = None)]
pub struct Cli {
    /// Items per page (overrides the config file)
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the bearer token used for API requests
    Login {
        /// Token issued by the backend
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// List movies
    Movies {
        /// Title search
        #[arg(short, long)]
        query: Option<String>,

        /// Only movies on your watchlist
        #[arg(short, long)]
        watchlist: bool,

        #[command(flatten)]
        paging: PagingArgs,
    },
    /// List upcoming showtimes
    Showtimes {
        /// Movie title search
        #[arg(short, long)]
        query: Option<String>,

        /// Only movies on your watchlist
        #[arg(short, long)]
        watchlist: bool,

        /// Cinema id (repeatable)
        #[arg(short, long = "cinema")]
        cinemas: Vec<String>,

        /// Day, e.g. 2026-10-24 (repeatable)
        #[arg(short, long = "day")]
        days: Vec<String>,

        /// Start time window, e.g. 18:00-23:30 (repeatable)
        #[arg(short, long = "time-range", value_parser = parse_time_range)]
        time_ranges: Vec<Range>,

        /// Your status: going, interested or not-going (repeatable)
        #[arg(short, long = "status")]
        statuses: Vec<ShowtimeStatus>,

        #[command(flatten)]
        paging: PagingArgs,

        /// Refresh from a new snapshot after loading
        #[arg(long)]
        refresh: bool,
    },
    /// Search users to befriend
    Friends {
        /// Name or username
        query: String,

        #[command(flatten)]
        paging: PagingArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PagingArgs {
    /// Maximum number of pages to load
    #[arg(short, long, default_value_t = 1)]
    pub pages: usize,
}

fn parse_time_range(s: &str) -> Result<Range, String> {
    Range::from_time_window(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_showtimes_filters() {
        let cli = Cli::try_parse_from([
            "reelfeed",
            "--limit",
            "5",
            "showtimes",
            "--watchlist",
            "--cinema",
            "3",
            "--cinema",
            "1",
            "--time-range",
            "18:00-20:00",
            "--status",
            "going",
            "--pages",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.limit, Some(5));
        match cli.command {
            Commands::Showtimes {
                watchlist,
                cinemas,
                time_ranges,
                statuses,
                paging,
                ..
            } => {
                assert!(watchlist);
                assert_eq!(cinemas, vec!["3", "1"]);
                assert_eq!(time_ranges, vec![Range::new(1080, 1200).unwrap()]);
                assert_eq!(statuses, vec![ShowtimeStatus::Going]);
                assert_eq!(paging.pages, 2);
            }
            _ => panic!("expected showtimes"),
        }
    }

    #[test]
    fn test_rejects_bad_time_range() {
        let result = Cli::try_parse_from(["reelfeed", "showtimes", "--time-range", "late"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_friends_requires_query() {
        assert!(Cli::try_parse_from(["reelfeed", "friends"]).is_err());
    }
}
