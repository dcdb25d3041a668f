use super::{body_string, expect_err, test_app};
use crate::db::crawl_runs::start_crawl_run;
use crate::router::handle;
use crate::scraper::{run_crawl, CrawlConfig, ListingRecord};
use crate::tests::utils::{listing, search_page, ScriptedFetcher};
use astra::Body;
use http::Request;
use serde_json::{json, Value};

const START: &str = "https://zillow.com/homes/seattle-wa/";

/// App with one finished run (id 1) holding two listings.
fn app_with_run() -> crate::router::AppState {
    let app = test_app(ScriptedFetcher::new());

    let fetcher = ScriptedFetcher::new().page(
        START,
        search_page(
            vec![listing("21", json!("$650,000")), json!({"detailUrl": "/homedetails/22_zpid/"})],
            None,
        ),
    );
    let run_id = app
        .db
        .with_conn(|conn| start_crawl_run(conn, "seattle-wa", START, 0))
        .unwrap();
    let config = CrawlConfig::for_region("zillow.com", "seattle-wa").unwrap();
    run_crawl(&app.db, &fetcher, config, run_id).unwrap();

    app
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[test]
fn run_page_shows_listings() {
    let app = app_with_run();

    let resp = handle(get("/runs/1"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("seattle-wa"));
    assert!(body.contains("Listings (2)"));
    assert!(body.contains("$650,000"));
    assert!(body.contains("/homedetails/22_zpid/"));
}

#[test]
fn json_export_uses_record_field_names() {
    let app = app_with_run();

    let resp = handle(get("/runs/1/listings.json"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let records: Vec<Value> = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["home_URL"], "https://www.zillow.com/homedetails/21_zpid/");
    assert_eq!(records[0]["home_price"], "$650,000");

    // The sparse entry keeps every field, unknown ones as null.
    let sparse = records[1].as_object().unwrap();
    assert_eq!(sparse.len(), ListingRecord::FIELDS.len());
    assert!(sparse["home_price"].is_null());
    assert!(sparse["num_beds"].is_null());
}

#[test]
fn xlsx_export_is_an_attachment() {
    let app = app_with_run();

    let resp = handle(get("/runs/1/listings.xlsx"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("listings_run_1.xlsx"));
}

#[test]
fn missing_runs_and_bad_ids_are_not_found() {
    let app = app_with_run();

    for uri in ["/runs/99", "/runs/abc", "/runs/1/listings.csv"] {
        let err = expect_err(handle(get(uri), &app));
        assert_eq!(err.status(), 404, "{uri}");
    }
}
