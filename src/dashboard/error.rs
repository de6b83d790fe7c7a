// dashboard/error.rs - Error type shared by the dashboard core
//
// Every fallible operation in the library returns DashboardError.
// Binaries and integration tests wrap it in anyhow.

use thiserror::Error;

/// Errors produced by the catalog, the filter container and the helpers around them
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A filter key that names no filter dimension
    #[error("invalid filter key '{0}'")]
    InvalidFilterKey(String),

    /// A known filter key with a value that cannot be parsed
    #[error("invalid value '{value}' for filter '{key}'")]
    InvalidFilterValue { key: String, value: String },

    #[error("duplicate product id {0} in catalog")]
    DuplicateProductId(u32),

    #[error("product {0} not found")]
    ProductNotFound(u32),

    /// Import text could not be parsed in the requested format
    #[error("{format} import failed: {message}")]
    Import { format: String, message: String },

    #[error("{format} export failed: {message}")]
    Export { format: String, message: String },

    #[error("failed to load catalog: {0}")]
    CatalogLoad(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Outbound KPI/alert request failure
    #[cfg(feature = "poller")]
    #[error("metrics request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl DashboardError {
    pub(crate) fn invalid_value(key: &str, value: &str) -> Self {
        DashboardError::InvalidFilterValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// True for errors caused by caller input rather than by the catalog or environment
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DashboardError::InvalidFilterKey(_)
                | DashboardError::InvalidFilterValue { .. }
                | DashboardError::Import { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DashboardError::InvalidFilterKey("colour".to_string());
        assert_eq!(err.to_string(), "invalid filter key 'colour'");

        let err = DashboardError::invalid_value("page", "abc");
        assert_eq!(err.to_string(), "invalid value 'abc' for filter 'page'");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(DashboardError::InvalidFilterKey("x".into()).is_client_error());
        assert!(DashboardError::Import {
            format: "CSV".into(),
            message: "bad".into()
        }
        .is_client_error());
        assert!(!DashboardError::ProductNotFound(7).is_client_error());
        assert!(!DashboardError::Config("bad".into()).is_client_error());
    }
}
