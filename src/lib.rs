//! Product scraping and seeding pipeline.
//!
//! `scrape_products` crawls a paginated storefront listing into
//! `products.json` plus a directory of images; `seed_products` loads that
//! dataset into SQLite alongside generated demo users and reviews.

pub mod archiver;
pub mod config;
pub mod crawler;
pub mod currency;
pub mod enricher;
pub mod errors;
pub mod fetcher;
pub mod images;
pub mod models;
pub mod parser;
pub mod seed;
pub mod slug;
