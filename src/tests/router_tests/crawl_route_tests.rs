use super::{body_string, expect_err, test_app};
use crate::db::crawl_runs::get_run;
use crate::router::handle;
use crate::tests::utils::{listing, search_page, ScriptedFetcher};
use astra::Body;
use http::{Method, Request};
use serde_json::json;
use std::time::{Duration, Instant};

fn post_form(uri: &str, form: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

#[test]
fn home_page_lists_no_runs_initially() {
    let app = test_app(ScriptedFetcher::new());

    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Start Crawl"));
    assert!(body.contains("No crawls yet."));
}

#[test]
fn posting_a_region_starts_a_background_crawl() {
    let fetcher = ScriptedFetcher::new().page(
        "https://zillow.com/homes/brooklyn-ny/",
        search_page(vec![listing("7", json!("$899,000"))], None),
    );
    let app = test_app(fetcher);

    let resp = handle(post_form("/crawl", "region=brooklyn-ny"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 302, "Should redirect after starting");
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/"
    );

    // Wait for the crawl thread to close the run.
    let deadline = Instant::now() + Duration::from_secs(10);
    let run = loop {
        let run = app.db.with_conn(|conn| get_run(conn, 1)).unwrap().unwrap();
        if !run.is_running() || Instant::now() > deadline {
            break run;
        }
        std::thread::sleep(Duration::from_millis(20));
    };

    assert_eq!(run.region, "brooklyn-ny");
    assert!(run.success, "run failed: {:?}", run.error_message);
    assert_eq!(run.listings_seen, Some(1));

    let home = handle(
        Request::builder().uri("/").body(Body::empty()).unwrap(),
        &app,
    )
    .unwrap();
    assert!(body_string(home).contains("brooklyn-ny"));
}

#[test]
fn invalid_region_is_rejected() {
    let app = test_app(ScriptedFetcher::new());

    let err = expect_err(handle(post_form("/crawl", "region=New+York%21"), &app));
    assert_eq!(err.status(), 400);

    let err = expect_err(handle(post_form("/crawl", "other=1"), &app));
    assert_eq!(err.status(), 400);

    let runs = app
        .db
        .with_conn(|conn| crate::db::crawl_runs::get_recent_runs(conn))
        .unwrap();
    assert!(runs.is_empty(), "no run should be recorded");
}

#[test]
fn unknown_route_is_not_found() {
    let app = test_app(ScriptedFetcher::new());
    let req = Request::builder()
        .uri("/admin")
        .body(Body::empty())
        .unwrap();

    let err = expect_err(handle(req, &app));
    assert_eq!(err.status(), 404);
}
