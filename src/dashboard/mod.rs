// dashboard/mod.rs - Root module for the cold-chain warehouse dashboard
//
// This module holds the data core behind the dashboard: the read-only
// product catalog, the filter/search state container and everything the
// dashboard panels read from it.
//
// Architecture:
// - model/: Product, filter criteria and view types (no I/O)
// - api/: Catalog plus pure query functions; HTTP handlers with `server`
// - session/: ProductStore, recent searches, smart filters, suggestions
// - transfer.rs: CSV / JSON / HTML import and export of flat records
// - metrics.rs: Remote KPI/alert poller (`poller`)
// - ledger.rs: Demo blockchain records (simulation only)
// - config.rs: Environment configuration for the binaries

pub mod error;
pub mod model;
pub mod api;
pub mod session;
pub mod transfer;
pub mod ledger;
pub mod config;

// Outbound HTTP polling needs reqwest and a tokio runtime
#[cfg(feature = "poller")]
pub mod metrics;

pub use api::catalog::Catalog;
pub use error::{DashboardError, Result};
pub use model::{FilterCriteria, FilterUpdate, Product, ProductView};
pub use session::{ProductStore, StoreConfig};
