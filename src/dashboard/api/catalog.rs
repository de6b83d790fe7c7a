// dashboard/api/catalog.rs - Read-only product catalog
//
// The catalog is seeded once at startup (embedded sample data or a JSON
// file) and never mutated afterwards. It is cheap to clone: clones share
// the same product slice.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::dashboard::error::{DashboardError, Result};
use crate::dashboard::model::Product;

/// Immutable, shared collection of products in insertion order
#[derive(Clone, Debug)]
pub struct Catalog {
    products: Arc<[Product]>,
}

/// Accepted catalog file layouts: `{"products": [...]}` or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { products: Vec<Product> },
    Bare(Vec<Product>),
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(DashboardError::DuplicateProductId(product.id));
            }
        }

        Ok(Catalog {
            products: products.into(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| DashboardError::CatalogLoad(e.to_string()))?;

        let products = match file {
            CatalogFile::Wrapped { products } => products,
            CatalogFile::Bare(products) => products,
        };

        Catalog::new(products)
    }

    /// Load a catalog from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading catalog from {}", path.display());

        let json = fs::read_to_string(path)
            .map_err(|e| DashboardError::CatalogLoad(format!("{}: {}", path.display(), e)))?;
        let catalog = Catalog::from_json_str(&json)?;

        tracing::info!("Catalog loaded with {} products", catalog.len());
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Distinct provinces in first-seen order
    pub fn provinces(&self) -> Vec<String> {
        distinct(self.products.iter().map(|p| p.province.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
