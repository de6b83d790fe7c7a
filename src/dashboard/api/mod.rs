// dashboard/api/mod.rs - Catalog access and query layer
//
// catalog: the read-only product collection
// queries: pure functions deriving views, facets, analytics and alerts
// handlers: HTTP endpoints over the two (server feature only)

pub mod catalog;
pub mod queries;

#[cfg(feature = "server")]
pub mod handlers;
