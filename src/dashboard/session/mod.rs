// dashboard/session/mod.rs - Per-session dashboard state
//
// store: the filter/search state container
// history: bounded recent-search list
// smart_filter: token vocabulary mapped to filter updates
// suggestions: ranked search-box suggestions

pub mod history;
pub mod smart_filter;
pub mod store;
pub mod suggestions;

pub use store::{ProductStore, StoreConfig};
