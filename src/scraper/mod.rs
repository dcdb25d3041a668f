pub mod crawl;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod pagination;
pub mod runner;
mod scraper_error;
pub mod value_path;

pub use crawl::{Crawl, CrawlConfig, CrawlEvent, CrawlOutcome, CrawlReport, EmittedRecord};
pub use fetcher::{FetchSettings, HttpFetcher, PageFetcher, SharedFetcher};
pub use models::{HomePrice, ListingRecord};
pub use runner::{run_crawl, spawn_crawl, CrawlSettings};
pub use scraper_error::{CrawlConfigError, CrawlError, ExtractionError, FetchError};
