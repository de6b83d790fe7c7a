// fixtures/mod.rs - Catalog fixtures
//
// A fixture is reusable seed data. Instead of building the same product
// list in every test or binary, we define it once and load it by name.
//
// Example: Instead of this everywhere...
//   let json = std::fs::read_to_string("data/cold_chain_catalog.json")?;
//   let catalog = Catalog::from_json_str(&json)?;
//
// We just use: ColdChainCatalog::catalog()?

pub mod catalogs;

use crate::dashboard::api::catalog::Catalog;
use crate::dashboard::error::Result;

/// A trait that every seed catalog implements
pub trait CatalogFixture {
    /// The JSON document holding the products, in catalog order
    fn source_json() -> &'static str;

    fn catalog() -> Result<Catalog> {
        Catalog::from_json_str(Self::source_json())
    }
}
