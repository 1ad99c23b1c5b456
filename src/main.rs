use anyhow::{Context, Result};
use retail_product_scraper::archiver;
use retail_product_scraper::config::ScrapeConfig;
use retail_product_scraper::crawler::{CrawlStop, Scraper};
use retail_product_scraper::fetcher::HttpFetcher;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ScrapeConfig::from_env()?;
    let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;

    let mut scraper = Scraper::new(&config, &fetcher)?;
    let report = scraper.crawl();

    match &report.stop {
        CrawlStop::Exhausted => {}
        CrawlStop::FetchFailed(e) => log::warn!("Crawl truncated at {}", e.url()),
        CrawlStop::PageLimit => log::warn!("Crawl stopped at the {}-page limit", config.max_pages),
        CrawlStop::Cycle(url) => log::warn!("Crawl stopped on revisited page {url}"),
        CrawlStop::Unresolvable(link) => log::warn!("Crawl stopped on bad next link {link}"),
    }

    archiver::save_dataset(&report.products, &config.output_file).with_context(|| {
        format!("Failed to write {}", config.output_file.display())
    })?;

    log::info!(
        "Scraped {} products from {} pages",
        report.products.len(),
        report.pages_visited
    );
    log::info!("Scraped data saved to {}", config.output_file.display());
    log::info!("Images saved to {}", config.image_dir.display());
    println!("Products archived successfully.");
    Ok(())
}
