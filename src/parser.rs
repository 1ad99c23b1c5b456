use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::errors::ParseError;
use crate::models::{DESCRIPTION_NOT_FOUND, ListingEntry, ListingPage, ProductDetails};

const LAZY_SRC: &str = "data-src";
const BRAND_ATTR: &str = "data-ga4-item_brand";
const CATEGORY_ATTR: &str = "data-ga4-item_category";

/// Compiled selectors for listing and detail pages of the storefront.
pub struct ListingParser {
    article: Selector,
    title: Selector,
    price: Selector,
    image: Selector,
    anchor: Selector,
    reviews: Selector,
    next_page: Selector,
    description: Selector,
    spec_section: Selector,
    spec_item: Selector,
    spec_label: Selector,
    carousel: Selector,
    carousel_image: Selector,
}

impl ListingParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            article: selector("article.prd")?,
            title: selector("h3.name")?,
            price: selector("div.prc")?,
            image: selector("img.img")?,
            anchor: selector("a.core")?,
            reviews: selector("div.rev")?,
            next_page: selector(r#"a[aria-label="Next"]"#)?,
            description: selector("div.markup.-mhm.-pvl.-oxa.-sc")?,
            spec_section: selector("section.card.aim.-mtm.-fs16")?,
            spec_item: selector("li")?,
            spec_label: selector("span.-b")?,
            carousel: selector("div.crs")?,
            carousel_image: selector("img")?,
        })
    }

    /// Extracts every product entry and the "Next" link from a listing page.
    pub fn parse_listing(&self, html: &str) -> ListingPage {
        let doc = Html::parse_document(html);

        let entries = doc
            .select(&self.article)
            .map(|article| self.parse_entry(article))
            .collect();

        let next_page = doc
            .select(&self.next_page)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        ListingPage { entries, next_page }
    }

    fn parse_entry(&self, article: ElementRef<'_>) -> ListingEntry {
        let anchor = article.select(&self.anchor).next();

        ListingEntry {
            title: first_text(article, &self.title),
            price: first_text(article, &self.price),
            image_url: article
                .select(&self.image)
                .next()
                .map(|img| img.value().attr(LAZY_SRC).unwrap_or_default().trim().to_string()),
            brand: anchor.and_then(|a| a.value().attr(BRAND_ATTR)).map(str::to_string),
            category: anchor
                .and_then(|a| a.value().attr(CATEGORY_ATTR))
                .map(str::to_string),
            detail_link: anchor
                .and_then(|a| a.value().attr("href"))
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .map(str::to_string),
            reviews: first_text(article, &self.reviews),
        }
    }

    /// Extracts description, specifications and carousel images from a
    /// product page.
    pub fn parse_detail(&self, html: &str) -> ProductDetails {
        let doc = Html::parse_document(html);

        let description = doc
            .select(&self.description)
            .next()
            .map(stripped_text)
            .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string());

        let mut sku = None;
        let mut specifications = BTreeMap::new();
        if let Some(section) = doc.select(&self.spec_section).next() {
            for item in section.select(&self.spec_item) {
                let Some(label) = item.select(&self.spec_label).next() else {
                    continue;
                };
                let raw_label = text_of(label);
                let key = raw_label.replace(':', "").trim().to_string();
                let value = text_of(item)
                    .replacen(raw_label.as_str(), "", 1)
                    .trim()
                    .trim_start_matches(':')
                    .trim()
                    .to_string();

                if key == "SKU" {
                    sku = Some(value.clone());
                }
                specifications.insert(key, value);
            }
        }

        let image_urls = doc
            .select(&self.carousel)
            .next()
            .map(|carousel| {
                carousel
                    .select(&self.carousel_image)
                    .filter_map(|img| img.value().attr(LAZY_SRC))
                    .filter(|src| !src.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        ProductDetails {
            description,
            sku,
            specifications,
            image_urls,
        }
    }
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Joins the element's text nodes after trimming each of them.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(text_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <article class="prd _fb col c-prd">
          <a class="core" href="/samsung-a05-128gb.html"
             data-ga4-item_brand="Samsung" data-ga4-item_category="Phones &amp; Tablets">
            <div class="img-c"><img class="img" data-src="https://img.test/unsafe/300x300/product/1.jpg?1700000001" /></div>
            <div class="info">
              <h3 class="name"> Samsung Galaxy A05 </h3>
              <div class="prc">KSh 13,999</div>
              <div class="rev">4.1 out of 5 (320)</div>
            </div>
          </a>
        </article>
        <article class="prd">
          <img class="img" />
        </article>
        <div class="pg-w">
          <a class="pg" aria-label="Previous" href="/phones/?page=1">&lt;</a>
          <a class="pg" aria-label="Next" href="/phones/?page=3">&gt;</a>
        </div>
        </body></html>
    "#;

    const DETAIL: &str = r#"
        <html><body>
        <div class="crs">
          <img data-src="https://img.test/a.jpg?11" />
          <img data-src="https://img.test/b.jpg?12" />
          <img data-src="https://img.test/a.jpg?11" />
          <img src="placeholder.png" />
        </div>
        <div class="markup -mhm -pvl -oxa -sc">
          <p>Big screen.</p>
          <p> Long battery. </p>
        </div>
        <section class="card aim -mtm -fs16">
          <ul>
            <li><span class="-b">SKU</span>: SA948MP5T6</li>
            <li><span class="-b">Color:</span> Black</li>
            <li>No label here</li>
          </ul>
        </section>
        </body></html>
    "#;

    #[test]
    fn parses_listing_entries_and_next_link() {
        let parser = ListingParser::new().unwrap();
        let page = parser.parse_listing(LISTING);

        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.next_page.as_deref(), Some("/phones/?page=3"));

        let first = &page.entries[0];
        assert_eq!(first.title.as_deref(), Some("Samsung Galaxy A05"));
        assert_eq!(first.price.as_deref(), Some("KSh 13,999"));
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://img.test/unsafe/300x300/product/1.jpg?1700000001")
        );
        assert_eq!(first.brand.as_deref(), Some("Samsung"));
        assert_eq!(first.category.as_deref(), Some("Phones & Tablets"));
        assert_eq!(first.detail_link.as_deref(), Some("/samsung-a05-128gb.html"));
        assert_eq!(first.reviews.as_deref(), Some("4.1 out of 5 (320)"));

        let bare = &page.entries[1];
        assert_eq!(bare.title, None);
        assert_eq!(bare.price, None);
        assert_eq!(bare.image_url.as_deref(), Some(""));
        assert_eq!(bare.detail_link, None);
        assert_eq!(bare.reviews, None);
    }

    #[test]
    fn last_page_has_no_next_link() {
        let parser = ListingParser::new().unwrap();
        let page = parser.parse_listing("<html><body><p>empty</p></body></html>");
        assert!(page.entries.is_empty());
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn parses_detail_page() {
        let parser = ListingParser::new().unwrap();
        let details = parser.parse_detail(DETAIL);

        assert_eq!(details.description, "Big screen.Long battery.");
        assert_eq!(details.sku.as_deref(), Some("SA948MP5T6"));
        assert_eq!(details.specifications.len(), 2);
        assert_eq!(details.specifications["Color"], "Black");
        assert_eq!(
            details.image_urls,
            vec![
                "https://img.test/a.jpg?11",
                "https://img.test/b.jpg?12",
                "https://img.test/a.jpg?11",
            ]
        );
    }

    #[test]
    fn detail_page_without_markup_uses_placeholders() {
        let parser = ListingParser::new().unwrap();
        let details = parser.parse_detail("<html><body></body></html>");

        assert_eq!(details.description, DESCRIPTION_NOT_FOUND);
        assert_eq!(details.sku, None);
        assert!(details.specifications.is_empty());
        assert!(details.image_urls.is_empty());
    }
}
