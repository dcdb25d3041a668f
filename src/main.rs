use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::db::crawl_runs::close_interrupted_runs;
use crate::router::{handle, AppState};
use crate::scraper::HttpFetcher;
use astra::Server;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod errors;
mod responses;
mod router;
mod scraper;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,home_scrape=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.database_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    match db.with_conn(|conn| close_interrupted_runs(conn, Utc::now().timestamp())) {
        Ok(0) => {}
        Ok(n) => warn!(runs = n, "closed crawl runs interrupted by a previous shutdown"),
        Err(e) => {
            error!(error = %e, "could not close interrupted crawl runs");
            std::process::exit(1);
        }
    }

    let fetcher = match HttpFetcher::new(&config.fetch) {
        Ok(f) => f,
        Err(e) => {
            error!(error = %e, "could not build HTTP client");
            std::process::exit(1);
        }
    };

    let app = AppState {
        db,
        crawl: config.crawl.clone(),
        fetcher: Arc::new(fetcher),
    };

    info!(addr = %config.bind_addr, site = %app.crawl.site_domain, "starting server");

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => templates::html_error_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down cleanly");
}
