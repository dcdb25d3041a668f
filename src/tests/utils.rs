use crate::db::connection::{init_db, Database};
use crate::scraper::{FetchError, PageFetcher};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Initialize a fresh test DB using the production schema
pub fn init_test_db() -> Database {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let path = std::env::temp_dir().join(format!(
        "home_scrape_test_{}_{}_{}.sqlite",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

/// A `__NEXT_DATA__` document with the given listings and pagination.
pub fn next_data(listings: Vec<Value>, next_url: Option<&str>) -> Value {
    let pagination = match next_url {
        Some(u) => json!({ "nextUrl": u }),
        None => json!({}),
    };
    json!({
        "props": {
            "pageProps": {
                "searchPageState": {
                    "cat1": {
                        "searchResults": { "listResults": listings },
                        "searchList": { "pagination": pagination, "totalPages": 2 }
                    }
                }
            }
        },
        "page": "/search/SearchPage"
    })
}

pub fn search_page(listings: Vec<Value>, next_url: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Homes for sale</title></head><body>
        <div id="__next"></div>
        <script id="__NEXT_DATA__" type="application/json">{}</script>
        </body></html>"#,
        next_data(listings, next_url)
    )
}

pub fn listing(zpid: &str, price: Value) -> Value {
    json!({
        "zpid": zpid,
        "detailUrl": format!("https://www.zillow.com/homedetails/{zpid}_zpid/"),
        "statusType": "FOR_SALE",
        "price": price,
        "address": format!("{zpid} Broadway, New York, NY 10001"),
        "addressZipcode": "10001",
        "beds": 3,
        "baths": 2,
        "area": 1200,
        "hdpData": { "homeInfo": { "homeType": "APARTMENT", "daysOnZillow": 5 } }
    })
}

/// Serves canned bodies by URL and records every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<String, u16>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), Ok(body));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            None => Err(FetchError::Network(format!("no route to {url}"))),
        }
    }
}
