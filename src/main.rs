//! # newsdesk
//!
//! A terminal news reader for NewsAPI. It lists top headlines by category,
//! runs full-text searches with paging, and shows single articles.
//!
//! ## Features
//!
//! - Category browsing and full-text search against NewsAPI v2
//! - "Load more" paging that appends to the list in order
//! - Detail view for an article, addressed by its position in the headlines
//! - Interactive session with routes (`/`, `/article/:id`)
//! - Optional JSON snapshots of what the list showed
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... newsdesk headlines -c technology -p 2
//! NEWS_API_KEY=... newsdesk search "solar power" -j ./json
//! NEWS_API_KEY=... newsdesk browse
//! ```
//!
//! ## Architecture
//!
//! 1. **Config**: flags, environment and `newsdesk.yaml` resolve to a [`config::ReaderConfig`]
//! 2. **Fetching**: [`api::NewsApiClient`] turns requests into article batches
//! 3. **Controllers**: list and detail controllers own view state and fold errors into it
//! 4. **Views**: state renders to plain text on stdout; logs go to stderr

use chrono::{Datelike, Local};
use clap::Parser;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod browse;
mod cli;
mod config;
mod controllers;
mod error;
mod models;
mod outputs;
mod routes;
mod utils;
mod views;

use api::NewsApiClient;
use browse::Session;
use cli::{Cli, Command};
use config::ReaderConfig;
use controllers::detail::DetailController;
use controllers::list::ListController;
use outputs::json::{Snapshot, write_snapshot};
use routes::Route;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // stdout carries the rendered pages, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("newsdesk starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(command = ?args.command, "Parsed CLI arguments");

    let config = ReaderConfig::load(&args).await?;
    let client = NewsApiClient::new(&config)?;
    debug!(?client, "News client ready");

    match args.command {
        Command::Headlines {
            category,
            pages,
            json_output_dir,
        } => {
            let category = config.category(category.as_deref())?;
            show_list(&client, &config, &category, None, pages, json_output_dir.as_deref()).await;
        }
        Command::Search {
            query,
            pages,
            json_output_dir,
        } => {
            show_list(
                &client,
                &config,
                &config.default_category,
                Some(&query),
                pages,
                json_output_dir.as_deref(),
            )
            .await;
        }
        Command::Article { id } => show_article(&client, &id).await,
        Command::Open { route } => match route.parse::<Route>()? {
            Route::List => {
                show_list(&client, &config, &config.default_category, None, 1, None).await
            }
            Route::Article(id) => show_article(&client, &id).await,
        },
        Command::Browse => {
            let mut session = Session::new(
                client,
                config.categories.clone(),
                &config.default_category,
                Local::now().year(),
                std::io::stdout(),
            );
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session.run(stdin).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        elapsed_secs = elapsed.as_secs_f64(),
        "newsdesk finished"
    );
    Ok(())
}

/// Load `pages` pages of a category (or of `query`) and print the list page.
///
/// Fetch failures end up in the rendered page, not in an `Err`.
#[instrument(level = "info", skip(client, config))]
async fn show_list(
    client: &NewsApiClient,
    config: &ReaderConfig,
    category: &str,
    query: Option<&str>,
    pages: u32,
    json_output_dir: Option<&str>,
) {
    let mut list = ListController::new(client.clone(), category);
    match query {
        Some(q) => {
            if !list.search(q).await {
                warn!("Empty search query; nothing fetched");
            }
        }
        None => list.mount().await,
    }
    for _ in 1..pages {
        if list.state().error.is_some() || !list.load_more().await {
            break;
        }
    }

    let now = Local::now();
    print!("{}", views::list::render(list.state(), &config.categories, now.year()));

    if let Some(dir) = json_output_dir {
        let snapshot = Snapshot::from_state(list.state(), now);
        match write_snapshot(&snapshot, dir, &now.date_naive().to_string()).await {
            Ok(path) => info!(path = %path.display(), "Snapshot written"),
            Err(e) => warn!(error = %e, "Failed to write JSON snapshot"),
        }
    }
}

/// Resolve route id `id` and print the detail page.
#[instrument(level = "info", skip(client))]
async fn show_article(client: &NewsApiClient, id: &str) {
    let mut detail = DetailController::new(client.clone());
    detail.resolve(id).await;
    print!("{}", views::detail::render(detail.state()));
}
