// analytics_tests.rs - KPI cards, alerts, suggestions and the demo ledger
//
// Expected figures are worked out by hand from data/cold_chain_catalog.json.

mod common;

use common::{sample_catalog, sample_store};

use coldchain_wms::dashboard::api::queries;
use coldchain_wms::dashboard::ledger::DemoLedger;
use coldchain_wms::dashboard::model::{AlertSeverity, TemperatureClass};
use coldchain_wms::dashboard::session::suggestions::SuggestionKind;
use rust_decimal::Decimal;

#[test]
fn test_catalog_totals() {
    let summary = queries::analytics(&sample_catalog());

    assert_eq!(summary.total_products, 16);
    assert_eq!(summary.total_units, 1070);
    assert_eq!(summary.low_stock_count, 7);
    assert_eq!(summary.out_of_stock_count, 2);
    assert_eq!(summary.verified_count, 9);
    assert_eq!(summary.inventory_value, Decimal::from(147_749_000));
}

#[test]
fn test_category_stats() {
    let summary = queries::analytics(&sample_catalog());

    let seafood = &summary.category_stats[0];
    assert_eq!(seafood.category, "Hải sản");
    assert_eq!(seafood.count, 5);
    assert_eq!(seafood.units, 177);
    assert_eq!(seafood.avg_price, Decimal::from(227_000));

    let total: usize = summary.category_stats.iter().map(|s| s.count).sum();
    assert_eq!(total, 16);
    assert!(summary
        .category_stats
        .windows(2)
        .all(|w| w[0].count >= w[1].count));
}

#[test]
fn test_temperature_breakdown() {
    let summary = queries::analytics(&sample_catalog());
    let counts: Vec<(TemperatureClass, usize)> = summary
        .temperature_breakdown
        .iter()
        .map(|t| (t.temperature_class, t.count))
        .collect();

    assert_eq!(
        counts,
        vec![
            (TemperatureClass::Chill, 9),
            (TemperatureClass::Frozen, 4),
            (TemperatureClass::Dry, 3),
        ]
    );
}

#[test]
fn test_price_histogram() {
    let catalog = sample_catalog();
    let buckets = queries::price_histogram(catalog.products(), Decimal::from(100_000));

    let shape: Vec<(Decimal, usize)> = buckets.iter().map(|b| (b.min, b.count)).collect();
    assert_eq!(
        shape,
        vec![
            (Decimal::from(0), 9),
            (Decimal::from(100_000), 1),
            (Decimal::from(200_000), 3),
            (Decimal::from(300_000), 1),
            (Decimal::from(400_000), 1),
            (Decimal::from(1_800_000), 1),
        ]
    );
    assert!(buckets.iter().all(|b| b.max - b.min == Decimal::from(100_000)));
}

#[test]
fn test_inventory_alert_order() {
    let alerts = queries::inventory_alerts(&sample_catalog());
    let order: Vec<(&str, AlertSeverity)> = alerts
        .iter()
        .map(|a| (a.sku.as_str(), a.severity))
        .collect();

    assert_eq!(
        order,
        vec![
            ("SEA-SQD-004", AlertSeverity::Critical),
            ("DAI-MLK-012", AlertSeverity::Critical),
            ("MEA-BEF-005", AlertSeverity::Warning),
            ("SEA-SHR-002", AlertSeverity::Warning),
            ("FRU-DRG-010", AlertSeverity::Warning),
            ("DRY-CSH-015", AlertSeverity::Warning),
            ("MEA-CHK-007", AlertSeverity::Warning),
        ]
    );
}

#[test]
fn test_suggestions_for_partial_input() {
    let store = sample_store();
    let suggestions = store.suggestions("tôm", 5);

    assert_eq!(suggestions[0].text, "Tôm sú đông lạnh");
    assert_eq!(suggestions[0].kind, SuggestionKind::Product);
    assert_eq!(suggestions[0].product_id, Some(2));
}

#[test]
fn test_suggestions_include_recent_searches() {
    let mut store = sample_store();
    store.set_search("xoài cát");
    let suggestions = store.suggestions("xoài", 5);

    let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
    assert!(texts.contains(&"xoài cát"));
    assert!(texts.contains(&"Xoài cát Chu"));
}

#[test]
fn test_demo_ledger_over_catalog() {
    let catalog = sample_catalog();
    let mut ledger = DemoLedger::seeded(2026);

    let mut last_block = 0;
    for product in catalog.products() {
        let record = ledger.simulate(product);
        assert!(record.simulated);
        assert_eq!(record.catalog_verified, product.blockchain_verified);
        assert!(record.block_number > last_block);
        last_block = record.block_number;
    }
}
