use crate::scraper::fetcher::DEFAULT_USER_AGENT;
use crate::scraper::{CrawlSettings, FetchSettings};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub crawl: CrawlSettings,
    pub fetch: FetchSettings,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "home_scrape.sqlite3".to_string()),
            schema_path: env::var("SCHEMA_PATH").unwrap_or_else(|_| "sql/schema.sql".to_string()),
            bind_addr: parsed("BIND_ADDR")?
                .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000))),
            max_workers: parsed("MAX_WORKERS")?.unwrap_or(8),
            crawl: CrawlSettings {
                site_domain: env::var("SITE_DOMAIN").unwrap_or_else(|_| "zillow.com".to_string()),
                max_pages: parsed("MAX_PAGES")?,
            },
            fetch: FetchSettings {
                user_agent: env::var("USER_AGENT")
                    .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
                timeout: Duration::from_secs(parsed("FETCH_TIMEOUT_SECS")?.unwrap_or(60)),
                max_attempts: parsed("FETCH_MAX_ATTEMPTS")?.unwrap_or(3),
            },
        })
    }
}

/// Unset or blank is `None`; anything else must parse.
fn parsed<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::Invalid {
                    name,
                    value: v.clone(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names; env is process-global.
    #[test]
    fn parsed_handles_unset_blank_and_garbage() {
        env::remove_var("HOME_SCRAPE_TEST_UNSET");
        assert_eq!(parsed::<u32>("HOME_SCRAPE_TEST_UNSET").unwrap(), None);

        env::set_var("HOME_SCRAPE_TEST_BLANK", "  ");
        assert_eq!(parsed::<u32>("HOME_SCRAPE_TEST_BLANK").unwrap(), None);

        env::set_var("HOME_SCRAPE_TEST_NUM", " 42 ");
        assert_eq!(parsed::<u32>("HOME_SCRAPE_TEST_NUM").unwrap(), Some(42));

        env::set_var("HOME_SCRAPE_TEST_BAD", "lots");
        let err = parsed::<u32>("HOME_SCRAPE_TEST_BAD").unwrap_err();
        assert!(err.to_string().contains("HOME_SCRAPE_TEST_BAD"));
    }
}
