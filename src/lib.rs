// lib.rs - Root module for the coldchain_wms library
//
// The library is what the binaries and the integration tests build on.
// Everything needed to filter, search and summarise the catalog lives in
// `dashboard`; `fixtures` carries the embedded sample catalog.

/// Sample catalogs for binaries, demos and tests
pub mod fixtures;

/// Catalog, filter/search state and dashboard helpers
pub mod dashboard;
