// common/mod.rs - Shared test utilities
//
// Helpers to build stores and catalogs from the embedded sample data and
// to read derived views back as SKU lists, so each test states its
// expectations in terms a person can check against the data file.

#![allow(dead_code)]

use coldchain_wms::dashboard::model::{Product, ProductView};
use coldchain_wms::dashboard::{Catalog, ProductStore, StoreConfig};
use coldchain_wms::fixtures::{catalogs::ColdChainCatalog, CatalogFixture};

/// The embedded sample catalog
pub fn sample_catalog() -> Catalog {
    ColdChainCatalog::catalog().expect("embedded sample catalog must load")
}

/// A store over the sample catalog with default settings
pub fn sample_store() -> ProductStore {
    ProductStore::new(sample_catalog(), StoreConfig::default())
}

/// A store over the sample catalog with a custom page size
pub fn sample_store_with_page_size(page_size: u32) -> ProductStore {
    ProductStore::new(
        sample_catalog(),
        StoreConfig {
            page_size,
            ..StoreConfig::default()
        },
    )
}

/// SKUs of the current page, in display order
pub fn view_skus(view: &ProductView) -> Vec<String> {
    view.items.iter().map(|p| p.sku.clone()).collect()
}

/// SKUs of a product list, in order
pub fn skus<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<String> {
    products.into_iter().map(|p| p.sku.clone()).collect()
}
