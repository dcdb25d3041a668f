mod crawl_route_tests;
mod run_route_tests;

use crate::router::AppState;
use crate::scraper::{CrawlSettings, PageFetcher};
use crate::tests::utils::init_test_db;
use astra::Response;
use std::io::Read;
use std::sync::Arc;

pub fn test_app(fetcher: impl PageFetcher + Send + Sync + 'static) -> AppState {
    AppState {
        db: init_test_db(),
        crawl: CrawlSettings::default(),
        fetcher: Arc::new(fetcher),
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn expect_err(result: crate::responses::ResultResp) -> crate::errors::ServerError {
    match result {
        Ok(resp) => panic!("expected an error, got status {}", resp.status()),
        Err(e) => e,
    }
}
