use crate::errors::ServerError;
use crate::scraper::{CrawlOutcome, CrawlReport};
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug)]
pub struct CrawlRun {
    pub id: i64,
    pub region: String,
    pub start_url: String,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub pages_fetched: Option<i64>,
    pub listings_seen: Option<i64>,
    pub success: bool,
    pub error_message: Option<String>,
    pub failed_url: Option<String>,
    pub failed_page: Option<i64>,
}

impl CrawlRun {
    pub fn is_running(&self) -> bool {
        self.finished_at.is_none()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(CrawlRun {
            id: row.get(0)?,
            region: row.get(1)?,
            start_url: row.get(2)?,
            started_at: row.get(3)?,
            finished_at: row.get(4)?,
            pages_fetched: row.get(5)?,
            listings_seen: row.get(6)?,
            success: row.get(7)?,
            error_message: row.get(8)?,
            failed_url: row.get(9)?,
            failed_page: row.get(10)?,
        })
    }
}

const RUN_COLUMNS: &str = "id, region, start_url, started_at, finished_at, pages_fetched, \
     listings_seen, success, error_message, failed_url, failed_page";

pub fn start_crawl_run(
    conn: &Connection,
    region: &str,
    start_url: &str,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        "INSERT INTO crawl_runs (region, start_url, started_at, success) VALUES (?, ?, ?, 0)",
        params![region, start_url, now],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Close a run with whatever the crawl managed before it stopped.
pub fn end_crawl_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    report: &CrawlReport,
) -> Result<(), ServerError> {
    let (success, error, failed_url, failed_page) = match &report.outcome {
        CrawlOutcome::Done(_) => (true, None, None, None),
        CrawlOutcome::Failed(f) => (
            false,
            Some(f.error.to_string()),
            Some(f.url.as_str()),
            Some(f.page as i64),
        ),
    };

    conn.execute(
        "UPDATE crawl_runs SET finished_at = ?, pages_fetched = ?, listings_seen = ?, success = ?, \
         error_message = ?, failed_url = ?, failed_page = ? WHERE id = ?",
        params![
            now,
            report.pages_fetched as i64,
            report.records_emitted as i64,
            success,
            error,
            failed_url,
            failed_page,
            run_id
        ],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

/// Close a run that never got to crawl, e.g. because its thread could not start.
pub fn fail_crawl_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    message: &str,
) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE crawl_runs SET finished_at = ?, success = 0, error_message = ? \
         WHERE id = ? AND finished_at IS NULL",
        params![now, message, run_id],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

/// Mark runs left open by a previous process as failed. Returns how many were closed.
pub fn close_interrupted_runs(conn: &Connection, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "UPDATE crawl_runs SET finished_at = ?, success = 0, error_message = 'interrupted' \
         WHERE finished_at IS NULL",
        params![now],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))
}

pub fn get_recent_runs(conn: &Connection) -> Result<Vec<CrawlRun>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RUN_COLUMNS} FROM crawl_runs ORDER BY started_at DESC, id DESC LIMIT 50"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], CrawlRun::from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(runs)
}

pub fn get_run(conn: &Connection, run_id: i64) -> Result<Option<CrawlRun>, ServerError> {
    conn.query_row(
        &format!("SELECT {RUN_COLUMNS} FROM crawl_runs WHERE id = ?"),
        params![run_id],
        CrawlRun::from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(e.to_string()))
}
