use crate::scraper::FetchError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Anything that can turn a URL into a page body.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Shared fetcher handed to crawl threads.
pub type SharedFetcher = Arc<dyn PageFetcher + Send + Sync>;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(60),
            max_attempts: 3,
        }
    }
}

/// Blocking HTTP fetcher. Transport retries live here, not in the crawl.
pub struct HttpFetcher {
    client: Client,
    max_attempts: u32,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            max_attempts: settings.max_attempts.max(1),
        })
    }

    fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text().map_err(|e| FetchError::Network(e.to_string()))
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        const MAX_BACKOFF_SECS: u64 = 10;
        const JITTER_MAX_MILLIS: u64 = 2000;

        let mut attempt = 1;
        loop {
            let start = Instant::now();
            match self.try_fetch(url) {
                Ok(body) => {
                    debug!(url, attempt, elapsed = ?start.elapsed(), bytes = body.len(), "fetched page");
                    return Ok(body);
                }
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    warn!(url, attempt, elapsed = ?start.elapsed(), error = %e, "fetch failed, retrying");

                    let base = std::cmp::min(2 * u64::from(attempt), MAX_BACKOFF_SECS);
                    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MILLIS);
                    std::thread::sleep(Duration::from_secs(base) + Duration::from_millis(jitter));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// 4xx other than 429 will not get better on a second try.
fn is_retryable(err: &FetchError) -> bool {
    match err {
        FetchError::Network(_) => true,
        FetchError::Status { status, .. } => *status == 429 || *status >= 500,
        FetchError::Setup(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(is_retryable(&FetchError::Network("reset".into())));
        assert!(is_retryable(&FetchError::Status { status: 503, url: "u".into() }));
        assert!(is_retryable(&FetchError::Status { status: 429, url: "u".into() }));
        assert!(!is_retryable(&FetchError::Status { status: 404, url: "u".into() }));
        assert!(!is_retryable(&FetchError::Setup("tls".into())));
    }

    #[test]
    fn builds_with_default_settings() {
        assert!(HttpFetcher::new(&FetchSettings::default()).is_ok());
    }
}
