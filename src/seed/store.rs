//! SQLite persistence for seeded catalog data.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::slug::slugify;

pub type StoreResult<T> = Result<T, rusqlite::Error>;

pub type CategoryId = i64;
pub type ProductId = i64;
pub type UserId = i64;
pub type ReviewId = i64;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    slug        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    sku         TEXT UNIQUE,
    description TEXT NOT NULL,
    price       REAL,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    image       TEXT,
    stock       INTEGER NOT NULL DEFAULT 0,
    features    TEXT NOT NULL DEFAULT '{}',
    images      TEXT NOT NULL DEFAULT '[]',
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    date_joined   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    product_id  INTEGER NOT NULL REFERENCES products(id),
    rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    comment     TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS product_reviews (
    product_id  INTEGER NOT NULL REFERENCES products(id),
    review_id   INTEGER NOT NULL REFERENCES reviews(id),
    PRIMARY KEY (product_id, review_id)
);
"#;

/// Product row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub sku: Option<&'a str>,
    pub description: &'a str,
    pub price: Option<f64>,
    pub category_id: CategoryId,
    pub image: Option<&'a str>,
    pub stock: u32,
    /// JSON object of specification key/values.
    pub features: &'a str,
    /// JSON array of local image paths.
    pub images: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview<'a> {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: u8,
    pub comment: &'a str,
}

/// Write operations the seeder needs from a catalog store.
pub trait SeedStore {
    /// Returns the category id and whether it was created by this call.
    fn get_or_create_category(&self, name: &str) -> StoreResult<(CategoryId, bool)>;
    fn product_slug_taken(&self, slug: &str) -> StoreResult<bool>;
    fn create_product(&self, product: &NewProduct<'_>) -> StoreResult<ProductId>;
    fn create_user(&self, user: &NewUser<'_>) -> StoreResult<UserId>;
    fn create_review(&self, review: &NewReview<'_>) -> StoreResult<ReviewId>;
    /// Attaches reviews to a product's review set.
    fn link_reviews(&self, product_id: ProductId, reviews: &[ReviewId]) -> StoreResult<usize>;
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub categories: usize,
    pub products: usize,
    pub users: usize,
    pub reviews: usize,
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn counts(&self) -> StoreResult<StoreCounts> {
        let count = |table: &str| -> StoreResult<usize> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let n: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(StoreCounts {
            categories: count("categories")?,
            products: count("products")?,
            users: count("users")?,
            reviews: count("reviews")?,
        })
    }

    /// `(user_id, rating)` of every review linked to `product_id`.
    pub fn linked_reviews(&self, product_id: ProductId) -> StoreResult<Vec<(UserId, u8)>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.user_id, r.rating FROM reviews r
             JOIN product_reviews pr ON pr.review_id = r.id
             WHERE pr.product_id = ?1 AND r.product_id = ?1
             ORDER BY r.id",
        )?;
        let rows = stmt.query_map(params![product_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect()
    }

    fn category_slug_taken(&self, slug: &str) -> StoreResult<bool> {
        self.conn
            .query_row(
                "SELECT 1 FROM categories WHERE slug = ?1",
                params![slug],
                |_| Ok(()),
            )
            .optional()
            .map(|row| row.is_some())
    }

    fn unique_category_slug(&self, name: &str) -> StoreResult<String> {
        let mut base = slugify(name);
        if base.is_empty() {
            base = "category".to_string();
        }
        if !self.category_slug_taken(&base)? {
            return Ok(base);
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.category_slug_taken(&candidate)? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

impl SeedStore for SqliteStore {
    fn get_or_create_category(&self, name: &str) -> StoreResult<(CategoryId, bool)> {
        let existing = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE name = ?1",
                params![name],
                |row| row.get::<_, CategoryId>(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok((id, false));
        }

        let slug = self.unique_category_slug(name)?;
        self.conn.execute(
            "INSERT INTO categories (name, slug, created_at) VALUES (?1, ?2, ?3)",
            params![name, slug, now()],
        )?;
        Ok((self.conn.last_insert_rowid(), true))
    }

    fn product_slug_taken(&self, slug: &str) -> StoreResult<bool> {
        self.conn
            .query_row(
                "SELECT 1 FROM products WHERE slug = ?1",
                params![slug],
                |_| Ok(()),
            )
            .optional()
            .map(|row| row.is_some())
    }

    fn create_product(&self, product: &NewProduct<'_>) -> StoreResult<ProductId> {
        self.conn.execute(
            "INSERT INTO products
                (name, slug, sku, description, price, category_id, image, stock, features, images, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                product.name,
                product.slug,
                product.sku,
                product.description,
                product.price,
                product.category_id,
                product.image,
                product.stock,
                product.features,
                product.images,
                now(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_user(&self, user: &NewUser<'_>) -> StoreResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (username, email, password_hash, date_joined) VALUES (?1, ?2, ?3, ?4)",
            params![user.username, user.email, user.password_hash, now()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_review(&self, review: &NewReview<'_>) -> StoreResult<ReviewId> {
        self.conn.execute(
            "INSERT INTO reviews (user_id, product_id, rating, comment, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                review.user_id,
                review.product_id,
                review.rating,
                review.comment,
                now()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn link_reviews(&self, product_id: ProductId, reviews: &[ReviewId]) -> StoreResult<usize> {
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO product_reviews (product_id, review_id) VALUES (?1, ?2)",
        )?;
        let mut affected = 0;
        for review_id in reviews {
            affected += stmt.execute(params![product_id, review_id])?;
        }
        Ok(affected)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(category_id: CategoryId, slug: &str) -> NewProduct<'_> {
        NewProduct {
            name: "Hisense 43\" Smart TV",
            slug,
            sku: None,
            description: "Frameless",
            price: Some(231.22),
            category_id,
            image: Some("products/1700000001.jpg"),
            stock: 12,
            features: "{}",
            images: "[]",
        }
    }

    #[test]
    fn category_is_created_once() {
        let store = SqliteStore::open_in_memory().unwrap();

        let (first, created) = store.get_or_create_category("Electronics").unwrap();
        assert!(created);
        let (second, created) = store.get_or_create_category("Electronics").unwrap();
        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(store.counts().unwrap().categories, 1);
    }

    #[test]
    fn category_slugs_stay_unique() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.get_or_create_category("Phones & Tablets").unwrap();
        store.get_or_create_category("Phones Tablets").unwrap();

        let slugs: Vec<String> = store
            .conn
            .prepare("SELECT slug FROM categories ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(slugs, vec!["phones-tablets", "phones-tablets-2"]);
    }

    #[test]
    fn duplicate_product_slug_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (category_id, _) = store.get_or_create_category("TVs").unwrap();

        store.create_product(&sample_product(category_id, "hisense-43")).unwrap();
        let err = store.create_product(&sample_product(category_id, "hisense-43"));
        assert!(err.is_err());
        assert_eq!(store.counts().unwrap().products, 1);
    }

    #[test]
    fn reviews_are_linked_to_product() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (category_id, _) = store.get_or_create_category("TVs").unwrap();
        let product_id = store.create_product(&sample_product(category_id, "tv")).unwrap();
        let user_id = store
            .create_user(&NewUser {
                username: "jane.doe42",
                email: "jane.doe42@example.com",
                password_hash: "sha256$salt$hash",
            })
            .unwrap();
        let review_id = store
            .create_review(&NewReview {
                user_id,
                product_id,
                rating: 4,
                comment: "Works well.",
            })
            .unwrap();

        assert_eq!(store.link_reviews(product_id, &[review_id]).unwrap(), 1);
        assert_eq!(store.linked_reviews(product_id).unwrap(), vec![(user_id, 4)]);
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (category_id, _) = store.get_or_create_category("TVs").unwrap();
        let product_id = store.create_product(&sample_product(category_id, "tv")).unwrap();
        let user_id = store
            .create_user(&NewUser {
                username: "sam",
                email: "sam@example.com",
                password_hash: "x",
            })
            .unwrap();

        let err = store.create_review(&NewReview {
            user_id,
            product_id,
            rating: 6,
            comment: "",
        });
        assert!(err.is_err());
    }
}
