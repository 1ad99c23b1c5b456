//! CSV side files written during seeding for operator reference.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::SeedError;
use crate::seed::synthetic::GeneratedUser;

pub const USER_HEADERS: [&str; 3] = ["Username", "Email", "Password"];
pub const REVIEW_HEADERS: [&str; 4] = ["Username", "Product", "Rating", "Comment"];

pub struct SeedExports<W: Write> {
    users: csv::Writer<W>,
    reviews: csv::Writer<W>,
}

impl SeedExports<File> {
    /// Creates (truncating) both CSV files and writes their headers.
    pub fn create(
        users_path: impl AsRef<Path>,
        reviews_path: impl AsRef<Path>,
    ) -> Result<Self, SeedError> {
        Self::from_writers(File::create(users_path)?, File::create(reviews_path)?)
    }
}

impl<W: Write> SeedExports<W> {
    pub fn from_writers(users: W, reviews: W) -> Result<Self, SeedError> {
        let mut users = csv::Writer::from_writer(users);
        let mut reviews = csv::Writer::from_writer(reviews);
        users.write_record(USER_HEADERS)?;
        reviews.write_record(REVIEW_HEADERS)?;
        Ok(Self { users, reviews })
    }

    pub fn write_user(&mut self, user: &GeneratedUser) -> Result<(), SeedError> {
        self.users
            .write_record([&user.username, &user.email, &user.password])?;
        Ok(())
    }

    pub fn write_review(
        &mut self,
        username: &str,
        product: &str,
        rating: u8,
        comment: &str,
    ) -> Result<(), SeedError> {
        let rating = rating.to_string();
        self.reviews
            .write_record([username, product, rating.as_str(), comment])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SeedError> {
        self.users.flush()?;
        self.reviews.flush()?;
        Ok(())
    }
}
