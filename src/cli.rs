//! Command-line interface definitions for newsdesk.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Global options override the YAML config file; the API key can also
//! come from the `NEWS_API_KEY` environment variable.

use clap::{Parser, Subcommand};

/// Command-line arguments for newsdesk.
///
/// # Examples
///
/// ```sh
/// # Top technology headlines, two pages
/// newsdesk headlines -c technology -p 2
///
/// # Full-text search, saving a JSON snapshot
/// newsdesk search "solar power" -j ./json
///
/// # Detail view for the third headline
/// newsdesk article 2
///
/// # Interactive session
/// NEWS_API_KEY=... newsdesk browse
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file (defaults to ./newsdesk.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the news API (scheme and host)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Two-letter country code for top headlines
    #[arg(long, global = true)]
    pub country: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to show.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List top headlines for a category
    Headlines {
        /// Category to browse (defaults to the configured default category)
        #[arg(short, long)]
        category: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Also write a JSON snapshot of the list under this directory
        #[arg(short, long)]
        json_output_dir: Option<String>,
    },

    /// Search all articles
    Search {
        /// Full-text query
        query: String,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Also write a JSON snapshot of the list under this directory
        #[arg(short, long)]
        json_output_dir: Option<String>,
    },

    /// Show one article, by position in the current top headlines
    Article {
        /// Position in the top-headlines batch
        id: String,
    },

    /// Render a route: `/` or `/article/:id`
    Open {
        route: String,
    },

    /// Interactive session
    Browse,
}
