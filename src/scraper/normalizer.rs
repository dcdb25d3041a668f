use crate::scraper::models::{HomePrice, ListingRecord};
use crate::scraper::value_path::{lookup, lookup_f64, lookup_i64, lookup_str};
use serde_json::Value;

const HOME_INFO: [&str; 2] = ["hdpData", "homeInfo"];

/// Map one raw `listResults` entry onto a [`ListingRecord`].
///
/// Never fails: each field is looked up on its own and falls back to `None`.
pub fn normalize(entry: &Value) -> ListingRecord {
    let home_info = lookup(entry, &HOME_INFO);

    ListingRecord {
        home_type: home_info
            .and_then(|h| lookup_str(h, &["homeType"]))
            .map(str::to_owned),
        posted: home_info.and_then(|h| lookup_i64(h, &["daysOnZillow"])),
        home_url: owned_str(entry, "detailUrl"),
        home_status: owned_str(entry, "statusType"),
        home_price: price(entry),
        home_address: owned_str(entry, "address"),
        home_zipcode: zipcode(entry),
        num_beds: lookup_f64(entry, &["beds"]),
        num_baths: lookup_f64(entry, &["baths"]),
        home_area: lookup_f64(entry, &["area"]),
    }
}

fn owned_str(entry: &Value, key: &str) -> Option<String> {
    lookup_str(entry, &[key]).map(str::to_owned)
}

fn price(entry: &Value) -> Option<HomePrice> {
    match lookup(entry, &["price"])? {
        Value::Number(n) => n.as_f64().map(HomePrice::Number),
        Value::String(s) => Some(HomePrice::Text(s.clone())),
        _ => None,
    }
}

// Usually a string, occasionally a bare number.
fn zipcode(entry: &Value) -> Option<String> {
    match lookup(entry, &["addressZipcode"])? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
