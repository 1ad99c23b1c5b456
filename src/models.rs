use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_REVIEWS: &str = "No reviews";
pub const NO_DESCRIPTION: &str = "No description available";
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";
pub const DESCRIPTION_FETCH_FAILED: &str = "Error fetching description";

/// One scraped product as written to `products.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub slug: Option<String>,
    pub price_local: String,
    pub price_usd: Option<f64>,
    pub sku: Option<String>,
    pub description: String,
    pub specifications: BTreeMap<String, String>,
    /// Primary listing image, stored locally.
    pub image: Option<String>,
    /// Detail-page carousel images, stored locally, in page order.
    pub images: Vec<String>,
    pub stock: Option<u32>,
    pub brand: String,
    pub category: String,
    pub reviews_summary: String,
}

/// Raw fields of one `article` on a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: Option<String>,
    pub price: Option<String>,
    /// `Some("")` when the image tag exists but its lazy-load attribute is blank.
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub detail_link: Option<String>,
    pub reviews: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    pub next_page: Option<String>,
}

/// Attributes only present on a product's own page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub description: String,
    pub sku: Option<String>,
    pub specifications: BTreeMap<String, String>,
    /// Remote image URLs; duplicates are kept.
    pub image_urls: Vec<String>,
}

impl ProductDetails {
    /// Placeholder used when the detail page could not be fetched.
    pub fn unavailable() -> Self {
        Self {
            description: DESCRIPTION_FETCH_FAILED.to_string(),
            sku: None,
            specifications: BTreeMap::new(),
            image_urls: Vec::new(),
        }
    }
}
