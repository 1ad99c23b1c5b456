//! Product image storage.
//!
//! Files are named after the source URL and never overwritten. Names are
//! claimed in an in-process registry before anything is written, so two
//! downloads can never pick the same file even if they run concurrently.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::errors::ImageError;
use crate::fetcher::Fetch;

const EXTENSION: &str = "jpg";

pub struct ImageStore {
    dir: PathBuf,
    claimed: Mutex<HashSet<PathBuf>>,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Fetches `url` and writes it under a collision-free name.
    pub fn download<F: Fetch + ?Sized>(
        &self,
        fetcher: &F,
        url: &str,
    ) -> Result<PathBuf, ImageError> {
        let bytes = match fetcher.fetch_bytes(url) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Error downloading the image: {e}");
                return Err(e.into());
            }
        };

        fs::create_dir_all(&self.dir).map_err(|source| ImageError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.claim(&file_stem_for(url));
        if let Err(source) = fs::write(&path, bytes) {
            log::error!("Error writing the image {}: {source}", path.display());
            return Err(ImageError::Io { path, source });
        }

        log::info!("Image saved to {}", path.display());
        Ok(path)
    }

    /// Picks `<stem>.jpg`, then `<stem>_a.jpg`, `<stem>_b.jpg`, ... and
    /// reserves it.
    fn claim(&self, stem: &str) -> PathBuf {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut counter = 0usize;
        loop {
            let name = if counter == 0 {
                format!("{stem}.{EXTENSION}")
            } else {
                format!("{stem}_{}.{EXTENSION}", letter_suffix(counter))
            };
            let path = self.dir.join(name);
            if !path.exists() && !claimed.contains(&path) {
                claimed.insert(path.clone());
                return path;
            }
            counter += 1;
        }
    }
}

/// Derives a filesystem-safe stem from an image URL.
///
/// Storefront image URLs end in `<file>?<id>`; the id becomes the stem.
/// URLs without that shape fall back to the file stem of the last path
/// segment, then to a hash of the whole URL.
pub fn file_stem_for(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let last_segment = without_fragment.rsplit('/').next().unwrap_or_default();

    let mut parts = last_segment.split('?');
    let file_part = parts.next().unwrap_or_default();
    let query_token = parts.next().map(sanitize).unwrap_or_default();
    if !query_token.is_empty() {
        return query_token;
    }

    let basename = sanitize(
        Path::new(file_part)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default(),
    );
    if !basename.is_empty() {
        return basename;
    }

    let digest = Sha256::digest(url.as_bytes());
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

/// 1 -> "a", 26 -> "z", 27 -> "aa".
fn letter_suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
