//! Random demo identities and review text.

use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use sha2::{Digest, Sha256};

const FIRST_NAMES: &[&str] = &[
    "amina", "brian", "carol", "daniel", "esther", "felix", "grace", "hassan", "irene", "james",
    "kevin", "lucy", "mercy", "nathan", "olivia", "peter", "quinn", "rose", "samuel", "tabitha",
    "victor", "wanjiru", "xavier", "yvonne", "zawadi",
];

const LAST_NAMES: &[&str] = &[
    "achieng", "baraka", "chege", "davis", "evans", "fischer", "gitau", "hughes", "idris",
    "jensen", "kamau", "lopez", "mwangi", "njoroge", "otieno", "patel", "rotich", "smith",
    "tanaka", "wambui",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

const WORDS: &[&str] = &[
    "quality", "battery", "screen", "delivery", "price", "value", "works", "great", "solid",
    "product", "recommend", "fast", "sturdy", "expected", "packaging", "sound", "easy", "daily",
    "use", "after", "week", "really", "good", "would", "again", "buy", "light", "design",
    "performance", "charger", "original", "service",
];

const PASSWORD_LEN: usize = 12;

/// A demo account with its plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn generate_user<R: Rng + ?Sized>(rng: &mut R) -> GeneratedUser {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let separator = if rng.random_bool(0.5) { "." } else { "_" };
    let number: u16 = rng.random_range(1..10_000);
    let username = format!("{first}{separator}{last}{number}");
    let email = format!("{username}@{}", pick(rng, EMAIL_DOMAINS));
    let password = random_alphanumeric(rng, PASSWORD_LEN);

    GeneratedUser {
        username,
        email,
        password,
    }
}

/// Salted SHA-256 in the form `sha256$<salt>$<hex digest>`.
pub fn hash_password<R: Rng + ?Sized>(rng: &mut R, password: &str) -> String {
    let salt = random_alphanumeric(rng, 16);
    let digest = Sha256::digest(format!("{salt}{password}").as_bytes());
    format!("sha256${salt}${digest:x}")
}

/// Capitalized sentence of 4 to 10 words ending with a period.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.random_range(4..=10);
    let words: Vec<&str> = (0..count).map(|_| pick(rng, WORDS)).collect();
    let text = words.join(" ");

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

fn random_alphanumeric<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| {
            let byte: u8 = rng.sample(Alphanumeric);
            char::from(byte)
        })
        .collect()
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}
