//! Listing-page crawl: turns every product on every page into a
//! [`ProductRecord`], downloading images and detail pages along the way.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use url::Url;

use crate::config::ScrapeConfig;
use crate::currency::to_target_currency;
use crate::enricher::{DetailEnricher, DetailOutcome};
use crate::errors::{FetchError, ParseError};
use crate::fetcher::Fetch;
use crate::images::ImageStore;
use crate::models::{ListingEntry, NO_DESCRIPTION, NO_REVIEWS, NOT_AVAILABLE, ProductRecord};
use crate::parser::ListingParser;
use crate::slug::{SlugRegistry, slugify};

/// Products from a single listing page.
#[derive(Debug)]
pub struct PageOutcome {
    pub products: Vec<ProductRecord>,
    pub next_page: Option<String>,
}

/// Why the crawl ended.
#[derive(Debug)]
pub enum CrawlStop {
    /// The last page had no "Next" link.
    Exhausted,
    /// A listing page failed; everything after it is missing.
    FetchFailed(FetchError),
    /// `max_pages` pages were visited and another was still advertised.
    PageLimit,
    /// The "Next" link pointed back to a page already visited.
    Cycle(String),
    /// The "Next" link could not be turned into an absolute URL.
    Unresolvable(String),
}

#[derive(Debug)]
pub struct CrawlReport {
    pub products: Vec<ProductRecord>,
    pub pages_visited: usize,
    pub stop: CrawlStop,
}

pub struct Scraper<'a, F: ?Sized> {
    config: &'a ScrapeConfig,
    fetcher: &'a F,
    parser: ListingParser,
    images: ImageStore,
    slugs: SlugRegistry,
    rng: StdRng,
}

impl<'a, F: Fetch + ?Sized> Scraper<'a, F> {
    pub fn new(config: &'a ScrapeConfig, fetcher: &'a F) -> Result<Self, ParseError> {
        Ok(Self {
            config,
            fetcher,
            parser: ListingParser::new()?,
            images: ImageStore::new(config.image_dir.clone()),
            slugs: SlugRegistry::new(),
            rng: StdRng::from_os_rng(),
        })
    }

    /// Replaces the stock-quantity generator, mainly for reproducible runs.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Follows "Next" links from `start_url` until the site runs out of
    /// pages, a page fails, or a safety bound trips.
    pub fn crawl(&mut self) -> CrawlReport {
        let mut products = Vec::new();
        let mut visited = HashSet::new();
        let mut pages_visited = 0usize;
        let mut current = Url::parse(&self.config.start_url)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.config.start_url.clone());

        let stop = loop {
            log::info!("Scraping page: {current}");
            visited.insert(current.clone());
            pages_visited += 1;

            let page = match self.scrape_page(&current) {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Error fetching the URL: {e}");
                    break CrawlStop::FetchFailed(e);
                }
            };
            products.extend(page.products);

            let Some(next) = page.next_page else {
                break CrawlStop::Exhausted;
            };
            let Some(next) = self.resolve_next_page(&next) else {
                log::error!("Cannot resolve next page link {next}");
                break CrawlStop::Unresolvable(next);
            };
            if visited.contains(&next) {
                log::warn!("Next page {next} was already visited, stopping");
                break CrawlStop::Cycle(next);
            }
            if pages_visited >= self.config.max_pages {
                log::warn!(
                    "Stopping after {} pages; {next} was not scraped",
                    self.config.max_pages
                );
                break CrawlStop::PageLimit;
            }
            current = next;
        };

        CrawlReport {
            products,
            pages_visited,
            stop,
        }
    }

    /// Scrapes one listing page, including each product's detail page and
    /// images.
    pub fn scrape_page(&mut self, url: &str) -> Result<PageOutcome, FetchError> {
        let html = self.fetcher.fetch_html(url)?;
        let page = self.parser.parse_listing(&html);

        let products = page
            .entries
            .into_iter()
            .map(|entry| self.build_record(entry))
            .collect();

        Ok(PageOutcome {
            products,
            next_page: page.next_page,
        })
    }

    fn build_record(&mut self, entry: ListingEntry) -> ProductRecord {
        let slug = entry
            .title
            .as_deref()
            .map(slugify)
            .filter(|slug| !slug.is_empty())
            .map(|slug| self.slugs.claim(&slug));
        let title = entry.title.unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let (price_local, price_usd) = match entry.price {
            Some(price) => {
                let converted = to_target_currency(&price, self.config.exchange_rate);
                (price, converted)
            }
            None => (NOT_AVAILABLE.to_string(), None),
        };

        // Source URL -> stored path, so a product never fetches an image twice.
        let mut downloaded: HashMap<String, Option<String>> = HashMap::new();

        let image = match entry.image_url.as_deref() {
            Some("") => {
                log::warn!("Product image not found for '{title}'");
                None
            }
            Some(url) => self.download_once(&mut downloaded, url),
            None => None,
        };

        let (description, sku, specifications, images, stock) = match entry.detail_link {
            Some(link) => {
                let outcome =
                    DetailEnricher::new(self.fetcher, &self.parser, &self.config.base_url)
                        .enrich(&link);
                if let DetailOutcome::Degraded { error, .. } = &outcome {
                    log::warn!("Using placeholder details for '{title}': {error}");
                }
                let details = outcome.into_details();
                let images = details
                    .image_urls
                    .iter()
                    .filter_map(|url| self.download_once(&mut downloaded, url))
                    .collect();
                let stock = self.rng.random_range(1..=199u32);
                (
                    details.description,
                    details.sku,
                    details.specifications,
                    images,
                    Some(stock),
                )
            }
            None => (
                NO_DESCRIPTION.to_string(),
                None,
                Default::default(),
                Vec::new(),
                None,
            ),
        };

        ProductRecord {
            title,
            slug,
            price_local,
            price_usd,
            sku,
            description,
            specifications,
            image,
            images,
            stock,
            brand: entry.brand.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            category: entry.category.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            reviews_summary: entry.reviews.unwrap_or_else(|| NO_REVIEWS.to_string()),
        }
    }

    fn download_once(
        &self,
        downloaded: &mut HashMap<String, Option<String>>,
        url: &str,
    ) -> Option<String> {
        if let Some(stored) = downloaded.get(url) {
            return stored.clone();
        }
        let stored = self
            .images
            .download(self.fetcher, url)
            .ok()
            .map(|path| path.display().to_string());
        downloaded.insert(url.to_string(), stored.clone());
        stored
    }

    fn resolve_next_page(&self, next: &str) -> Option<String> {
        if let Ok(absolute) = Url::parse(next) {
            return Some(absolute.to_string());
        }
        Url::parse(&self.config.start_url)
            .and_then(|base| base.join(next))
            .map(|url| url.to_string())
            .ok()
    }
}
