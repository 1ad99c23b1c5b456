use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Lowercases, drops punctuation and joins words with `-`.
///
/// Follows Django's `slugify`: the text is NFKD-decomposed and reduced to
/// ASCII, so accented letters keep their base letter. Characters other than
/// word characters, whitespace and `-` are removed, runs of whitespace and
/// `-` collapse to a single `-`, and leading/trailing `-`/`_` are stripped.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value
        .nfkd()
        .filter(char::is_ascii)
        .map(|ch| ch.to_ascii_lowercase())
    {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch.is_ascii_whitespace() || ch == '-' {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Hands out slugs that have not been used before in this run.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `slug` as used without renaming it.
    pub fn reserve(&mut self, slug: &str) {
        self.taken.insert(slug.to_string());
    }

    /// Returns `base` the first time it is seen, then `base-2`, `base-3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
