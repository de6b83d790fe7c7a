// fixtures/catalogs/cold_chain.rs
//
// What is this file?
// The sample cold-chain catalog: seafood, meat, produce, dairy and dry
// goods from Vietnamese provinces, spread across all three temperature
// classes, with some items at or below their reorder point and two items
// out of stock.
//
// The data itself lives in data/cold_chain_catalog.json and is embedded at
// compile time, so the server and the palette start without any files.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::dashboard::model::{Product, QualityGrade, TemperatureClass};
use crate::fixtures::CatalogFixture;

pub struct ColdChainCatalog;

impl CatalogFixture for ColdChainCatalog {
    fn source_json() -> &'static str {
        include_str!("../../../data/cold_chain_catalog.json")
    }
}

/// Minimal product with the given stock levels; other fields get neutral values
pub fn product_with_stock(id: u32, sku: &str, stock: u32, reorder_point: u32) -> Product {
    Product {
        id,
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        name_vi: format!("Sản phẩm {}", sku),
        category: "General".to_string(),
        subcategory: None,
        temperature_class: TemperatureClass::Dry,
        stock,
        reorder_point,
        price: Decimal::new(10_000, 0),
        province: "Hà Nội".to_string(),
        certifications: BTreeSet::new(),
        popular: false,
        blockchain_verified: false,
        quality_grade: QualityGrade::B,
        last_restocked: chrono::NaiveDateTime::default(),
    }
}
