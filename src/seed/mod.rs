//! Seeds a catalog store from a scraped dataset, inventing one demo user
//! per product and a handful of reviews.

use std::collections::HashSet;
use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::SeedError;
use crate::models::ProductRecord;
use crate::slug::{SlugRegistry, slugify};

pub mod export;
pub mod store;
pub mod synthetic;

use export::SeedExports;
use store::{NewProduct, NewReview, NewUser, SeedStore, UserId};
use synthetic::{GeneratedUser, generate_user, hash_password, sentence};

pub const MIN_REVIEWS: usize = 1;
pub const MAX_REVIEWS: usize = 5;

/// What a seeding run managed to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories_created: usize,
    pub products: usize,
    pub users: usize,
    pub reviews: usize,
}

/// Counts are accurate even when `error` is set; nothing is rolled back.
#[derive(Debug)]
pub struct SeedOutcome {
    pub report: SeedReport,
    pub error: Option<SeedError>,
}

pub struct Seeder<'a, S: ?Sized> {
    store: &'a S,
    rng: StdRng,
    export_review_rows: bool,
    /// Authors available for reviews, in creation order.
    authors: Vec<(UserId, String)>,
    usernames: HashSet<String>,
    slugs: SlugRegistry,
}

impl<'a, S: SeedStore + ?Sized> Seeder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            rng: StdRng::from_os_rng(),
            export_review_rows: false,
            authors: Vec::new(),
            usernames: HashSet::new(),
            slugs: SlugRegistry::new(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Also write one `generated_reviews.csv` row per review.
    pub fn export_review_rows(mut self, enabled: bool) -> Self {
        self.export_review_rows = enabled;
        self
    }

    /// Seeds `records` in order, stopping at the first failure.
    pub fn run<W: Write>(
        &mut self,
        records: &[ProductRecord],
        exports: &mut SeedExports<W>,
    ) -> SeedOutcome {
        let mut report = SeedReport::default();

        for record in records {
            if let Err(e) = self.seed_record(record, exports, &mut report) {
                log::error!("Error seeding data: {e}");
                return SeedOutcome {
                    report,
                    error: Some(e),
                };
            }
            log::info!(
                "Product '{}' seeded into database with fake users and reviews",
                record.title
            );
        }

        SeedOutcome {
            report,
            error: None,
        }
    }

    fn seed_record<W: Write>(
        &mut self,
        record: &ProductRecord,
        exports: &mut SeedExports<W>,
        report: &mut SeedReport,
    ) -> Result<(), SeedError> {
        let (category_id, created) = self.store.get_or_create_category(&record.category)?;
        if created {
            report.categories_created += 1;
        }

        let slug = match record.slug.as_deref().filter(|slug| !slug.is_empty()) {
            Some(slug) => {
                self.slugs.reserve(slug);
                slug.to_string()
            }
            None => self.fallback_slug(&record.title)?,
        };
        let features = serde_json::to_string(&record.specifications)?;
        let images = serde_json::to_string(&record.images)?;

        let product_id = self.store.create_product(&NewProduct {
            name: &record.title,
            slug: &slug,
            sku: record.sku.as_deref(),
            description: &record.description,
            price: record.price_usd,
            category_id,
            image: record.image.as_deref(),
            stock: record.stock.unwrap_or(0),
            features: &features,
            images: &images,
        })?;
        report.products += 1;

        let user = self.unique_user();
        let password_hash = hash_password(&mut self.rng, &user.password);
        let user_id = self.store.create_user(&NewUser {
            username: &user.username,
            email: &user.email,
            password_hash: &password_hash,
        })?;
        exports.write_user(&user)?;
        self.authors.push((user_id, user.username));
        report.users += 1;

        let review_count = self.rng.random_range(MIN_REVIEWS..=MAX_REVIEWS);
        let mut review_ids = Vec::with_capacity(review_count);
        for _ in 0..review_count {
            let author = self.rng.random_range(0..self.authors.len());
            let (author_id, author_name) = &self.authors[author];
            let rating = self.rng.random_range(1..=5u8);
            let comment = sentence(&mut self.rng);

            let review_id = self.store.create_review(&NewReview {
                user_id: *author_id,
                product_id,
                rating,
                comment: &comment,
            })?;
            if self.export_review_rows {
                exports.write_review(author_name, &record.title, rating, &comment)?;
            }
            review_ids.push(review_id);
            report.reviews += 1;
        }

        self.store.link_reviews(product_id, &review_ids)?;
        Ok(())
    }

    /// Slug for a record the crawl left without one. Skips slugs used earlier
    /// in this run or already stored.
    fn fallback_slug(&mut self, title: &str) -> Result<String, SeedError> {
        let mut base = slugify(title);
        if base.is_empty() {
            base = "product".to_string();
        }
        loop {
            let candidate = self.slugs.claim(&base);
            if !self.store.product_slug_taken(&candidate)? {
                return Ok(candidate);
            }
        }
    }

    /// A generated user whose username has not been used in this run.
    fn unique_user(&mut self) -> GeneratedUser {
        loop {
            let user = generate_user(&mut self.rng);
            if self.usernames.insert(user.username.clone()) {
                return user;
            }
        }
    }
}
