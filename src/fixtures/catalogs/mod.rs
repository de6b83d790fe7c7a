// fixtures/catalogs/mod.rs
//
// Seed catalogs plus a small product builder for tests.

pub mod cold_chain;

pub use cold_chain::{product_with_stock, ColdChainCatalog};
