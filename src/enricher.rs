use crate::errors::FetchError;
use crate::fetcher::Fetch;
use crate::models::ProductDetails;
use crate::parser::ListingParser;

/// Result of looking up a product's own page.
#[derive(Debug)]
pub enum DetailOutcome {
    Found(ProductDetails),
    /// The page could not be fetched; `details` holds placeholders.
    Degraded {
        details: ProductDetails,
        error: FetchError,
    },
}

impl DetailOutcome {
    pub fn into_details(self) -> ProductDetails {
        match self {
            DetailOutcome::Found(details) | DetailOutcome::Degraded { details, .. } => details,
        }
    }
}

pub struct DetailEnricher<'a, F: ?Sized> {
    fetcher: &'a F,
    parser: &'a ListingParser,
    base_url: &'a str,
}

impl<'a, F: Fetch + ?Sized> DetailEnricher<'a, F> {
    pub fn new(fetcher: &'a F, parser: &'a ListingParser, base_url: &'a str) -> Self {
        Self {
            fetcher,
            parser,
            base_url,
        }
    }

    pub fn enrich(&self, link: &str) -> DetailOutcome {
        let url = resolve_detail_url(self.base_url, link);
        match self.fetcher.fetch_html(&url) {
            Ok(html) => DetailOutcome::Found(self.parser.parse_detail(&html)),
            Err(error) => {
                log::error!("Error fetching the product page: {error}");
                DetailOutcome::Degraded {
                    details: ProductDetails::unavailable(),
                    error,
                }
            }
        }
    }
}

/// Absolute links are used as-is; anything else is appended to `base_url`.
pub fn resolve_detail_url(base_url: &str, link: &str) -> String {
    if url::Url::parse(link).is_ok() {
        return link.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        link.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_links_against_base() {
        assert_eq!(
            resolve_detail_url("https://shop.test", "/tv-43.html"),
            "https://shop.test/tv-43.html"
        );
        assert_eq!(
            resolve_detail_url("https://shop.test/ke/", "tv-43.html"),
            "https://shop.test/ke/tv-43.html"
        );
    }

    #[test]
    fn keeps_absolute_links() {
        assert_eq!(
            resolve_detail_url("https://shop.test", "https://other.test/tv.html"),
            "https://other.test/tv.html"
        );
    }
}
