use crate::scraper::value_path::lookup;
use crate::scraper::ExtractionError;
use scraper::{Html, Selector};
use serde_json::Value;

const NEXT_DATA_SELECTOR: &str = r#"script[id="__NEXT_DATA__"]"#;

const SEARCH_STATE: [&str; 4] = ["props", "pageProps", "searchPageState", "cat1"];
const LIST_RESULTS: [&str; 2] = ["searchResults", "listResults"];
const PAGINATION: [&str; 2] = ["searchList", "pagination"];

/// Parsed `__NEXT_DATA__` of a search results page.
///
/// Construction checks that the listing array and the pagination object are
/// both present, so the accessors below never have to fail.
#[derive(Debug, Clone)]
pub struct EmbeddedPayload {
    data: Value,
}

impl EmbeddedPayload {
    pub fn from_value(data: Value) -> Result<Self, ExtractionError> {
        let state = lookup(&data, &SEARCH_STATE).ok_or_else(|| {
            ExtractionError::MalformedPayload("searchPageState.cat1 missing".into())
        })?;

        if !lookup(state, &LIST_RESULTS).is_some_and(Value::is_array) {
            return Err(ExtractionError::MalformedPayload(
                "searchResults.listResults missing or not a list".into(),
            ));
        }
        if !lookup(state, &PAGINATION).is_some_and(Value::is_object) {
            return Err(ExtractionError::MalformedPayload(
                "searchList.pagination missing".into(),
            ));
        }

        Ok(Self { data })
    }

    fn search_state(&self) -> &Value {
        // Checked in from_value.
        &self.data["props"]["pageProps"]["searchPageState"]["cat1"]
    }

    /// Raw listing entries in site order.
    pub fn listings(&self) -> &[Value] {
        lookup(self.search_state(), &LIST_RESULTS)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn pagination(&self) -> &Value {
        &self.search_state()["searchList"]["pagination"]
    }
}

/// Pull the embedded JSON payload out of a page.
pub fn extract(html: &str) -> Result<EmbeddedPayload, ExtractionError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(NEXT_DATA_SELECTOR)
        .map_err(|e| ExtractionError::MalformedPayload(e.to_string()))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or(ExtractionError::MarkerNotFound)?;

    let json_text = element.text().collect::<String>();
    if json_text.trim().is_empty() {
        return Err(ExtractionError::MarkerNotFound);
    }

    let data: Value = serde_json::from_str(&json_text)
        .map_err(|e| ExtractionError::MalformedPayload(e.to_string()))?;

    EmbeddedPayload::from_value(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(script_body: &str) -> String {
        format!(
            r#"<html><head></head><body><div id="root"></div>
            <script id="__NEXT_DATA__" type="application/json">{script_body}</script>
            </body></html>"#
        )
    }

    fn payload_json(listings: Value) -> Value {
        json!({
            "props": {"pageProps": {"searchPageState": {"cat1": {
                "searchResults": {"listResults": listings},
                "searchList": {"pagination": {}}
            }}}}
        })
    }

    #[test]
    fn extracts_listings_in_order() {
        let body = payload_json(json!([{"zpid": "1"}, {"zpid": "2"}])).to_string();
        let payload = extract(&page(&body)).unwrap();

        let ids: Vec<&str> = payload
            .listings()
            .iter()
            .filter_map(|l| l["zpid"].as_str())
            .collect();
        assert_eq!(ids, ["1", "2"]);
        assert!(payload.pagination().is_object());
    }

    #[test]
    fn missing_marker() {
        let html = "<html><body><script>var x = 1;</script></body></html>";
        assert!(matches!(extract(html), Err(ExtractionError::MarkerNotFound)));
    }

    #[test]
    fn empty_marker_counts_as_missing() {
        assert!(matches!(
            extract(&page("   ")),
            Err(ExtractionError::MarkerNotFound)
        ));
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            extract(&page("{\"props\": ")),
            Err(ExtractionError::MalformedPayload(_))
        ));
    }

    #[test]
    fn missing_required_paths() {
        let no_pagination = json!({
            "props": {"pageProps": {"searchPageState": {"cat1": {
                "searchResults": {"listResults": []}
            }}}}
        });
        assert!(matches!(
            EmbeddedPayload::from_value(no_pagination),
            Err(ExtractionError::MalformedPayload(_))
        ));

        let listings_not_array = payload_json(json!({"oops": true}));
        assert!(matches!(
            EmbeddedPayload::from_value(listings_not_array),
            Err(ExtractionError::MalformedPayload(_))
        ));

        assert!(matches!(
            EmbeddedPayload::from_value(json!({"props": {}})),
            Err(ExtractionError::MalformedPayload(_))
        ));
    }
}
