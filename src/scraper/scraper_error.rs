use thiserror::Error;

/// Transport-level failure reported by a `PageFetcher`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("fetcher setup failed: {0}")]
    Setup(String),
}

/// The page did not carry a usable embedded payload.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("__NEXT_DATA__ not found")]
    MarkerNotFound,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Why a crawl stopped early.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("pagination points back to an already visited page")]
    CyclicPagination,

    #[error("record sink failed: {0}")]
    Sink(String),
}

#[derive(Debug, Error)]
pub enum CrawlConfigError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{url} is outside the allowed domains")]
    Offsite { url: String },

    #[error("invalid region slug: {0:?}")]
    InvalidRegion(String),
}
