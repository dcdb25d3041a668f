use crate::db::connection::Database;
use crate::db::crawl_runs::{end_crawl_run, fail_crawl_run, start_crawl_run};
use crate::db::listings::save_listing;
use crate::errors::ServerError;
use crate::scraper::crawl::{Crawl, CrawlConfig, CrawlReport};
use crate::scraper::fetcher::{PageFetcher, SharedFetcher};
use chrono::Utc;
use tracing::{error, info, info_span};

/// Host-side knobs for crawls started from the web UI.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub site_domain: String,
    pub max_pages: Option<usize>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            site_domain: "zillow.com".to_string(),
            max_pages: None,
        }
    }
}

impl CrawlSettings {
    pub fn config_for(&self, region: &str) -> Result<CrawlConfig, ServerError> {
        CrawlConfig::for_region(&self.site_domain, region)
            .map(|c| c.with_max_pages(self.max_pages))
            .map_err(|e| ServerError::BadRequest(e.to_string()))
    }
}

/// Record a new run and crawl it on its own thread. Returns the run id.
pub fn spawn_crawl(
    db: &Database,
    settings: &CrawlSettings,
    fetcher: SharedFetcher,
    region: &str,
) -> Result<i64, ServerError> {
    let config = settings.config_for(region)?;

    let run_id = db.with_conn(|conn| {
        start_crawl_run(conn, region, config.start_url(), Utc::now().timestamp())
    })?;

    let thread_db = db.clone(); // cheap clone (path only)
    let spawned = std::thread::Builder::new()
        .name(format!("crawl-{run_id}"))
        .spawn(move || {
            if let Err(e) = run_crawl(&thread_db, fetcher, config, run_id) {
                error!(run_id, error = %e, "crawl run could not be recorded");
            }
        });

    if let Err(e) = spawned {
        let message = format!("failed to spawn crawl thread: {e}");
        error!(run_id, %message, "crawl not started");
        db.with_conn(|conn| fail_crawl_run(conn, run_id, Utc::now().timestamp(), &message))?;
        return Err(ServerError::DbError(message));
    }

    Ok(run_id)
}

/// Run one crawl to completion, storing each listing as it is emitted.
pub fn run_crawl<F: PageFetcher>(
    db: &Database,
    fetcher: F,
    config: CrawlConfig,
    run_id: i64,
) -> Result<CrawlReport, ServerError> {
    let span = info_span!("crawl", run_id, start_url = %config.start_url());
    let _guard = span.enter();

    info!("crawl started");
    let report = Crawl::new(fetcher, config)
        .run(|emitted| db.with_conn(|conn| save_listing(conn, run_id, &emitted)));

    match report.outcome.failure() {
        None => info!(
            pages = report.pages_fetched,
            listings = report.records_emitted,
            "crawl complete"
        ),
        Some(failure) => error!(
            pages = report.pages_fetched,
            listings = report.records_emitted,
            %failure,
            "crawl failed"
        ),
    }

    db.with_conn(|conn| end_crawl_run(conn, run_id, Utc::now().timestamp(), &report))?;
    Ok(report)
}
