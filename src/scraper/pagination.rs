use crate::scraper::extractor::EmbeddedPayload;
use crate::scraper::value_path::lookup_str;

/// Absolute URL of the next results page, if the payload names one.
///
/// An absent `nextUrl` and an empty one both mean "last page".
pub fn resolve_next(payload: &EmbeddedPayload, base_url: &str) -> Option<String> {
    lookup_str(payload.pagination(), &["nextUrl"])
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{base_url}{fragment}"))
}
