use crate::db::crawl_runs::{get_recent_runs, get_run};
use crate::db::listings::get_listings_for_run;
use crate::db::Database;
use crate::errors::ServerError;
use crate::responses::{html_response, json_response, redirect, ResultResp};
use crate::scraper::{spawn_crawl, CrawlSettings, SharedFetcher};
use crate::spreadsheets::export_listings_xlsx;
use crate::templates::pages::{self, home::HomeVm};
use astra::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::info;

/// Everything a request handler needs; shared by all worker threads.
pub struct AppState {
    pub db: Database,
    pub crawl: CrawlSettings,
    pub fetcher: SharedFetcher,
}

pub fn handle(mut req: Request, app: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => home(app),
        ("POST", "/crawl") => {
            let form = read_form(&mut req)?;
            start_crawl(app, &form)
        }
        ("GET", p) if p.starts_with("/runs/") => run_routes(app, &p["/runs/".len()..]),
        _ => Err(ServerError::NotFound),
    }
}

fn home(app: &AppState) -> ResultResp {
    let runs = app.db.with_conn(|conn| get_recent_runs(conn))?;
    html_response(pages::home_page(&HomeVm {
        site_domain: &app.crawl.site_domain,
        runs: &runs,
    }))
}

fn start_crawl(app: &AppState, form: &HashMap<String, String>) -> ResultResp {
    let region = form
        .get("region")
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ServerError::BadRequest("region is required".into()))?;

    let run_id = spawn_crawl(&app.db, &app.crawl, app.fetcher.clone(), region)?;
    info!(run_id, region, "crawl queued");
    redirect("/")
}

// /runs/{id}, /runs/{id}/listings.xlsx, /runs/{id}/listings.json
fn run_routes(app: &AppState, rest: &str) -> ResultResp {
    let (id, tail) = rest.split_once('/').unwrap_or((rest, ""));
    let run_id: i64 = id.parse().map_err(|_| ServerError::NotFound)?;

    let run = app
        .db
        .with_conn(|conn| get_run(conn, run_id))?
        .ok_or(ServerError::NotFound)?;
    let listings = app.db.with_conn(|conn| get_listings_for_run(conn, run_id))?;

    match tail {
        "" => html_response(pages::run_page(&run, &listings)),
        "listings.xlsx" => export_listings_xlsx(&listings, run_id),
        "listings.json" => json_response(&listings, &format!("listings_run_{run_id}.json")),
        _ => Err(ServerError::NotFound),
    }
}

fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;

    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}
