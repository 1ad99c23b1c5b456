//! Runtime configuration for the two commands.
//!
//! Values come from the process environment (a `.env` file is honoured via
//! `dotenvy`). Both structs can also be built from an arbitrary lookup
//! function so tests never touch the real environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;

/// KSh to USD.
pub const DEFAULT_EXCHANGE_RATE: f64 = 0.00771;
pub const DEFAULT_MAX_PAGES: usize = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Settings for `scrape_products`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    /// Prefix for relative detail-page links.
    pub base_url: String,
    /// First listing page to crawl.
    pub start_url: String,
    pub exchange_rate: f64,
    /// Hard stop for the pagination loop.
    pub max_pages: usize,
    pub image_dir: PathBuf,
    pub output_file: PathBuf,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ScrapeConfig {
    pub fn new(base_url: impl Into<String>, start_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            start_url: start_url.into(),
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            max_pages: DEFAULT_MAX_PAGES,
            image_dir: PathBuf::from("products"),
            output_file: PathBuf::from("products.json"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, "SCRAPE_URL")?;
        let start_url = required(&lookup, "SCRAPE_URL_PAGE")?;
        let mut config = Self::new(base_url, start_url);

        if let Some(rate) = parsed::<f64, _>(&lookup, "SCRAPE_EXCHANGE_RATE")? {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::Invalid {
                    key: "SCRAPE_EXCHANGE_RATE",
                    value: rate.to_string(),
                });
            }
            config.exchange_rate = rate;
        }
        if let Some(max_pages) = parsed::<usize, _>(&lookup, "SCRAPE_MAX_PAGES")? {
            if max_pages == 0 {
                return Err(ConfigError::Invalid {
                    key: "SCRAPE_MAX_PAGES",
                    value: "0".into(),
                });
            }
            config.max_pages = max_pages;
        }
        if let Some(secs) = parsed::<u64, _>(&lookup, "SCRAPE_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = optional(&lookup, "SCRAPE_IMAGE_DIR") {
            config.image_dir = PathBuf::from(dir);
        }
        if let Some(file) = optional(&lookup, "SCRAPE_OUTPUT") {
            config.output_file = PathBuf::from(file);
        }
        if let Some(agent) = optional(&lookup, "SCRAPE_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }
}

/// Settings for `seed_products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub dataset: PathBuf,
    pub database: PathBuf,
    pub users_csv: PathBuf,
    pub reviews_csv: PathBuf,
    /// Write one row per generated review instead of the header alone.
    pub export_review_rows: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("products.json"),
            database: PathBuf::from("db.sqlite3"),
            users_csv: PathBuf::from("generated_users.csv"),
            reviews_csv: PathBuf::from("generated_reviews.csv"),
            export_review_rows: false,
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = optional(&lookup, "SEED_DATASET") {
            config.dataset = PathBuf::from(path);
        }
        if let Some(path) = optional(&lookup, "SEED_DATABASE") {
            config.database = PathBuf::from(path);
        }
        if let Some(path) = optional(&lookup, "SEED_USERS_CSV") {
            config.users_csv = PathBuf::from(path);
        }
        if let Some(path) = optional(&lookup, "SEED_REVIEWS_CSV") {
            config.reviews_csv = PathBuf::from(path);
        }
        if let Some(flag) = parsed::<bool, _>(&lookup, "SEED_EXPORT_REVIEWS")? {
            config.export_review_rows = flag;
        }
        Ok(config)
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

fn parsed<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, key) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn scrape_config_requires_both_urls() {
        let err = ScrapeConfig::from_lookup(lookup(&[("SCRAPE_URL", "https://shop.test")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SCRAPE_URL_PAGE"));
    }

    #[test]
    fn scrape_config_applies_defaults() {
        let config = ScrapeConfig::from_lookup(lookup(&[
            ("SCRAPE_URL", "https://shop.test"),
            ("SCRAPE_URL_PAGE", "https://shop.test/phones/"),
        ]))
        .unwrap();

        assert_eq!(config.exchange_rate, DEFAULT_EXCHANGE_RATE);
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.image_dir, PathBuf::from("products"));
        assert_eq!(config.output_file, PathBuf::from("products.json"));
    }

    #[test]
    fn scrape_config_rejects_bad_numbers() {
        let err = ScrapeConfig::from_lookup(lookup(&[
            ("SCRAPE_URL", "https://shop.test"),
            ("SCRAPE_URL_PAGE", "https://shop.test/phones/"),
            ("SCRAPE_MAX_PAGES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SCRAPE_MAX_PAGES", .. }));

        let err = ScrapeConfig::from_lookup(lookup(&[
            ("SCRAPE_URL", "https://shop.test"),
            ("SCRAPE_URL_PAGE", "https://shop.test/phones/"),
            ("SCRAPE_EXCHANGE_RATE", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SCRAPE_EXCHANGE_RATE", .. }));
    }

    #[test]
    fn seed_config_overrides() {
        let config = SeedConfig::from_lookup(lookup(&[
            ("SEED_DATABASE", "/tmp/demo.sqlite3"),
            ("SEED_EXPORT_REVIEWS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/demo.sqlite3"));
        assert_eq!(config.dataset, PathBuf::from("products.json"));
        assert!(config.export_review_rows);
    }
}
