// Catalog check
//
// Loads a catalog (first argument, WMS_CATALOG_PATH, or the embedded
// sample) and prints the KPI summary, the price histogram and every
// inventory alert. Exits non-zero if the catalog cannot be loaded.

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use coldchain_wms::dashboard::api::queries;
use coldchain_wms::dashboard::config::AppConfig;
use coldchain_wms::dashboard::model::AlertSeverity;
use coldchain_wms::dashboard::Catalog;
use coldchain_wms::fixtures::{catalogs::ColdChainCatalog, CatalogFixture};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let path = std::env::args().nth(1).map(Into::into).or(config.catalog_path);

    let catalog = match &path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => ColdChainCatalog::catalog().context("loading embedded sample catalog")?,
    };

    println!("Checking catalog...");
    match &path {
        Some(path) => println!("✓ Loaded {} products from {}", catalog.len(), path.display()),
        None => println!("✓ Loaded {} products from the embedded sample", catalog.len()),
    }

    let summary = queries::analytics(&catalog);
    println!("\nSummary:");
    println!("  Units in stock:   {}", summary.total_units);
    println!("  Inventory value:  {} VND", summary.inventory_value);
    println!("  Low stock:        {}", summary.low_stock_count);
    println!("  Out of stock:     {}", summary.out_of_stock_count);
    println!("  Verified:         {}", summary.verified_count);

    println!("\nCategories:");
    for stat in &summary.category_stats {
        println!(
            "  - {}: {} products, {} units, avg {} VND",
            stat.category, stat.count, stat.units, stat.avg_price
        );
    }

    println!("\nTemperature classes:");
    for entry in &summary.temperature_breakdown {
        println!("  - {}: {}", entry.temperature_class, entry.count);
    }

    println!("\nPrice histogram:");
    let histogram = queries::price_histogram(
        catalog.products(),
        Decimal::from(queries::DEFAULT_PRICE_BUCKET),
    );
    for bucket in histogram {
        println!("  {:>9} - {:>9}: {}", bucket.min, bucket.max, "#".repeat(bucket.count));
    }

    let alerts = queries::inventory_alerts(&catalog);
    println!("\nInventory alerts ({}):", alerts.len());
    if alerts.is_empty() {
        println!("  None");
    }
    for alert in alerts {
        let marker = match alert.severity {
            AlertSeverity::Critical => "✗",
            AlertSeverity::Warning => "!",
        };
        println!(
            "  {} {} {} ({}/{})",
            marker, alert.sku, alert.name, alert.stock, alert.reorder_point
        );
    }

    Ok(())
}
