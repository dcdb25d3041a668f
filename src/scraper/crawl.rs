use crate::scraper::extractor::{self, EmbeddedPayload};
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::models::ListingRecord;
use crate::scraper::normalizer::normalize;
use crate::scraper::pagination::resolve_next;
use crate::scraper::{CrawlConfigError, CrawlError, ExtractionError};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

/// Where a crawl starts, how next-page fragments are resolved, and which
/// hosts it may visit.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    start_url: String,
    base_url: String,
    allowed_domains: Vec<String>,
    max_pages: Option<usize>,
}

impl CrawlConfig {
    pub fn new(
        start_url: impl Into<String>,
        base_url: impl Into<String>,
        allowed_domains: Vec<String>,
    ) -> Result<Self, CrawlConfigError> {
        let config = Self {
            start_url: start_url.into(),
            base_url: base_url.into(),
            allowed_domains: allowed_domains
                .into_iter()
                .map(|d| d.trim().trim_start_matches('.').to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            max_pages: None,
        };

        let start = parse_url(&config.start_url)?;
        parse_url(&config.base_url)?;
        if !config.allows(&start) {
            return Err(CrawlConfigError::Offsite {
                url: config.start_url.clone(),
            });
        }

        Ok(config)
    }

    /// `https://<domain>/homes/<region>/`, following `https://www.<domain>/homes/<nextUrl>`.
    pub fn for_region(site_domain: &str, region: &str) -> Result<Self, CrawlConfigError> {
        let region = validate_region(region)?;
        Self::new(
            format!("https://{site_domain}/homes/{region}/"),
            format!("https://www.{site_domain}/homes/"),
            vec![site_domain.to_string()],
        )
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages.filter(|n| *n > 0);
        self
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exact host or any subdomain of an allowed domain. An empty list allows everything.
    pub fn allows(&self, url: &Url) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        self.allowed_domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    }
}

fn parse_url(raw: &str) -> Result<Url, CrawlConfigError> {
    let url = Url::parse(raw).map_err(|e| CrawlConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CrawlConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

/// The URL a page is fetched and remembered under. `raw` has already been
/// validated by [`CrawlConfig::new`]; anything unparsable is kept as-is.
fn page_key(raw: String) -> String {
    match Url::parse(&raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.into()
        }
        Err(_) => raw,
    }
}

/// Region slugs look like `new-york-ny`.
pub fn validate_region(region: &str) -> Result<&str, CrawlConfigError> {
    let slug = region.trim().trim_matches('/');
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(slug)
    } else {
        Err(CrawlConfigError::InvalidRegion(region.to_string()))
    }
}

/// A normalized listing plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedRecord {
    /// Zero-based page index within the crawl.
    pub page: usize,
    /// Zero-based position across the whole crawl.
    pub position: usize,
    pub record: ListingRecord,
}

#[derive(Debug)]
pub enum CrawlEvent {
    PageFetched { url: String, page: usize },
    Record(EmittedRecord),
    /// The one follow-up request produced by the page just emitted.
    NextPage { url: String, page: usize },
    Finished(CrawlOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The last page had no next-page fragment.
    Exhausted,
    PageLimit,
    /// The next page pointed outside the allowed domains and was dropped.
    Offsite,
}

/// The page at which a crawl stopped, and why.
#[derive(Debug)]
pub struct CrawlFailure {
    pub url: String,
    pub page: usize,
    pub error: CrawlError,
}

impl fmt::Display for CrawlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} ({}): {}", self.page, self.url, self.error)
    }
}

#[derive(Debug)]
pub enum CrawlOutcome {
    Done(DoneReason),
    Failed(CrawlFailure),
}

impl CrawlOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, CrawlOutcome::Done(_))
    }

    pub fn failure(&self) -> Option<&CrawlFailure> {
        match self {
            CrawlOutcome::Failed(f) => Some(f),
            CrawlOutcome::Done(_) => None,
        }
    }
}

/// Summary of a finished crawl. Records emitted before a failure stay valid.
#[derive(Debug)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    pub pages_fetched: usize,
    pub records_emitted: usize,
}

/// Observable phase of the crawl state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Fetching,
    Extracting,
    Emitting,
    Continuing,
    Done,
    Failed,
}

enum Step {
    Fetching,
    Extracting { body: String },
    Emitting { payload: EmbeddedPayload, cursor: usize },
    Continuing,
    Finishing(CrawlOutcome),
    Closed(CrawlPhase),
}

/// Sequential crawl over one paginated result set.
///
/// Iterating yields one [`CrawlEvent`] at a time; the last event is always
/// `Finished`. Dropping the crawl before that simply stops it.
pub struct Crawl<F> {
    fetcher: F,
    config: CrawlConfig,
    step: Step,
    url: String,
    page: usize,
    visited: HashSet<String>,
    pages_fetched: usize,
    /// Crawl-wide position of the next record.
    position: usize,
}

impl<F: PageFetcher> Crawl<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        let url = page_key(config.start_url.clone());
        let mut visited = HashSet::new();
        visited.insert(url.clone());

        Self {
            fetcher,
            config,
            step: Step::Fetching,
            url,
            page: 0,
            visited,
            pages_fetched: 0,
            position: 0,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        match &self.step {
            Step::Fetching => CrawlPhase::Fetching,
            Step::Extracting { .. } => CrawlPhase::Extracting,
            Step::Emitting { .. } => CrawlPhase::Emitting,
            Step::Continuing => CrawlPhase::Continuing,
            Step::Finishing(CrawlOutcome::Done(_)) => CrawlPhase::Done,
            Step::Finishing(CrawlOutcome::Failed(_)) => CrawlPhase::Failed,
            Step::Closed(phase) => *phase,
        }
    }

    /// Drive the crawl to the end, handing every record to `sink` in order.
    ///
    /// `records_emitted` in the report counts only records the sink accepted.
    pub fn run<S, E>(mut self, mut sink: S) -> CrawlReport
    where
        S: FnMut(EmittedRecord) -> Result<(), E>,
        E: fmt::Display,
    {
        let mut accepted = 0;
        while let Some(event) = self.next() {
            match event {
                CrawlEvent::Record(emitted) => {
                    if let Err(e) = sink(emitted) {
                        let failure = self.failure(CrawlError::Sink(e.to_string()));
                        warn!(%failure, records = accepted, "crawl aborted by sink");
                        return self.report(CrawlOutcome::Failed(failure), accepted);
                    }
                    accepted += 1;
                }
                CrawlEvent::Finished(outcome) => return self.report(outcome, accepted),
                CrawlEvent::PageFetched { .. } | CrawlEvent::NextPage { .. } => {}
            }
        }

        // The iterator always ends with Finished.
        self.report(CrawlOutcome::Done(DoneReason::Exhausted), accepted)
    }

    fn report(&self, outcome: CrawlOutcome, records_emitted: usize) -> CrawlReport {
        CrawlReport {
            outcome,
            pages_fetched: self.pages_fetched,
            records_emitted,
        }
    }

    fn failure(&self, error: CrawlError) -> CrawlFailure {
        CrawlFailure {
            url: self.url.clone(),
            page: self.page,
            error,
        }
    }

    fn fail(&mut self, error: CrawlError) {
        let failure = self.failure(error);
        warn!(%failure, records = self.position, "crawl failed");
        self.step = Step::Finishing(CrawlOutcome::Failed(failure));
    }

    fn finish(&mut self, reason: DoneReason) {
        info!(
            pages = self.pages_fetched,
            records = self.position,
            ?reason,
            "crawl done"
        );
        self.step = Step::Finishing(CrawlOutcome::Done(reason));
    }

    fn resolve(&mut self, payload: &EmbeddedPayload) -> Option<String> {
        let Some(next) = resolve_next(payload, &self.config.base_url) else {
            self.finish(DoneReason::Exhausted);
            return None;
        };

        let mut parsed = match Url::parse(&next) {
            Ok(u) => u,
            Err(e) => {
                self.fail(CrawlError::Extraction(ExtractionError::MalformedPayload(
                    format!("unusable nextUrl {next}: {e}"),
                )));
                return None;
            }
        };

        if !self.config.allows(&parsed) {
            warn!(url = %next, "next page is offsite, dropping it");
            self.finish(DoneReason::Offsite);
            return None;
        }

        // Pages are keyed by parsed form: dot segments collapsed, no fragment.
        parsed.set_fragment(None);
        let next = String::from(parsed);

        if !self.visited.insert(next.clone()) {
            self.fail(CrawlError::CyclicPagination);
            return None;
        }

        if self
            .config
            .max_pages
            .is_some_and(|max| self.pages_fetched >= max)
        {
            info!(max_pages = ?self.config.max_pages, "page limit reached");
            self.finish(DoneReason::PageLimit);
            return None;
        }

        Some(next)
    }
}

impl<F: PageFetcher> Iterator for Crawl<F> {
    type Item = CrawlEvent;

    fn next(&mut self) -> Option<CrawlEvent> {
        loop {
            match std::mem::replace(&mut self.step, Step::Closed(CrawlPhase::Done)) {
                Step::Fetching => {
                    info!(url = %self.url, page = self.page, "fetching page");
                    match self.fetcher.fetch(&self.url) {
                        Ok(body) => {
                            self.pages_fetched += 1;
                            self.step = Step::Extracting { body };
                            return Some(CrawlEvent::PageFetched {
                                url: self.url.clone(),
                                page: self.page,
                            });
                        }
                        Err(e) => self.fail(CrawlError::Fetch(e)),
                    }
                }

                Step::Extracting { body } => match extractor::extract(&body) {
                    Ok(payload) => {
                        info!(
                            url = %self.url,
                            page = self.page,
                            listings = payload.listings().len(),
                            "page parsed"
                        );
                        self.step = Step::Emitting { payload, cursor: 0 };
                    }
                    Err(e) => self.fail(CrawlError::Extraction(e)),
                },

                Step::Emitting { payload, cursor } => {
                    if let Some(entry) = payload.listings().get(cursor) {
                        let emitted = EmittedRecord {
                            page: self.page,
                            position: self.position,
                            record: normalize(entry),
                        };
                        self.position += 1;
                        self.step = Step::Emitting {
                            payload,
                            cursor: cursor + 1,
                        };
                        return Some(CrawlEvent::Record(emitted));
                    }

                    if let Some(next) = self.resolve(&payload) {
                        debug!(next = %next, "next page resolved");
                        self.url = next;
                        self.page += 1;
                        self.step = Step::Continuing;
                        return Some(CrawlEvent::NextPage {
                            url: self.url.clone(),
                            page: self.page,
                        });
                    }
                }

                Step::Continuing => self.step = Step::Fetching,

                Step::Finishing(outcome) => {
                    let phase = if outcome.is_done() {
                        CrawlPhase::Done
                    } else {
                        CrawlPhase::Failed
                    };
                    self.step = Step::Closed(phase);
                    return Some(CrawlEvent::Finished(outcome));
                }

                Step::Closed(phase) => {
                    self.step = Step::Closed(phase);
                    return None;
                }
            }
        }
    }
}
