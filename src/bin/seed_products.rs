use anyhow::{Context, Result};
use retail_product_scraper::archiver::load_dataset;
use retail_product_scraper::config::SeedConfig;
use retail_product_scraper::errors::SeedError;
use retail_product_scraper::seed::Seeder;
use retail_product_scraper::seed::export::SeedExports;
use retail_product_scraper::seed::store::SqliteStore;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SeedConfig::from_env()?;
    let store = SqliteStore::open(&config.database)
        .with_context(|| format!("Failed to open {}", config.database.display()))?;
    let mut exports = SeedExports::create(&config.users_csv, &config.reviews_csv)?;

    // Seeding failures are reported, not propagated; whatever was created stays.
    match load_dataset(&config.dataset) {
        Ok(records) => {
            let outcome = Seeder::new(&store)
                .export_review_rows(config.export_review_rows)
                .run(&records, &mut exports);
            let report = outcome.report;
            log::info!(
                "Seeded {} products, {} users, {} reviews ({} new categories)",
                report.products,
                report.users,
                report.reviews,
                report.categories_created
            );
            if let Some(e) = outcome.error {
                log::error!("Seeding stopped early: {e}");
            }
        }
        Err(e) => log::error!("Error seeding data: {}", SeedError::from(e)),
    }

    exports.flush()?;
    log::info!("Generated users saved to {}", config.users_csv.display());
    log::info!("Generated reviews saved to {}", config.reviews_csv.display());
    Ok(())
}
