//! Helpers for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use retail_product_scraper::config::ScrapeConfig;
use retail_product_scraper::errors::FetchError;
use retail_product_scraper::fetcher::Fetch;

pub const BASE_URL: &str = "https://shop.test";
pub const START_URL: &str = "https://shop.test/phones/";

/// In-memory fetcher; unknown URLs answer HTTP 404.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    pub fn file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|u| u.as_str() == url).count()
    }

    fn not_found(url: &str) -> FetchError {
        FetchError::Status {
            url: url.to_string(),
            status: 404,
        }
    }
}

impl Fetch for StaticFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }

    fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        self.files.get(url).cloned().ok_or_else(|| Self::not_found(url))
    }
}

pub fn scrape_config(image_dir: &Path) -> ScrapeConfig {
    let mut config = ScrapeConfig::new(BASE_URL, START_URL);
    config.image_dir = image_dir.to_path_buf();
    config
}

/// A listing page holding `articles` and, optionally, a "Next" link.
pub fn listing_page(articles: &[String], next: Option<&str>) -> String {
    let pager = next
        .map(|href| format!(r#"<a class="pg" aria-label="Next" href="{href}">&gt;</a>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body><div class="-paxs row _no-g _4cl-3cm-shs">{}</div><div class="pg-w">{pager}</div></body></html>"#,
        articles.join("\n")
    )
}

pub fn article(title: &str, price: &str, image: Option<&str>, detail: Option<&str>) -> String {
    let img = image
        .map(|src| format!(r#"<div class="img-c"><img class="img" data-src="{src}" /></div>"#))
        .unwrap_or_default();
    let body = format!(
        r#"{img}<div class="info"><h3 class="name">{title}</h3><div class="prc">{price}</div></div>"#
    );
    match detail {
        Some(href) => format!(
            r#"<article class="prd _fb col c-prd"><a class="core" href="{href}" data-ga4-item_brand="Samsung" data-ga4-item_category="Phones">{body}</a><div class="rev">4.5 out of 5</div></article>"#
        ),
        None => format!(r#"<article class="prd _fb col c-prd">{body}</article>"#),
    }
}

pub fn detail_page(description: &str, sku: &str, images: &[&str]) -> String {
    let imgs: String = images
        .iter()
        .map(|src| format!(r#"<img data-src="{src}" />"#))
        .collect();
    format!(
        r#"<html><body>
        <div class="crs">{imgs}</div>
        <div class="markup -mhm -pvl -oxa -sc">{description}</div>
        <section class="card aim -mtm -fs16"><ul>
          <li><span class="-b">SKU</span>: {sku}</li>
          <li><span class="-b">Weight (kg)</span>: 0.2</li>
        </ul></section>
        </body></html>"#
    )
}
