//! Error types for dataset retrieval.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("no dataset named '{name}' at {url}")]
    NotFound { name: String, url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_permanent() {
        let err = FetchError::NotFound {
            name: "planets2".to_string(),
            url: "https://example.test/planets2.csv".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "no dataset named 'planets2' at https://example.test/planets2.csv"
        );
    }

    #[test]
    fn test_server_error_is_retryable() {
        let err = FetchError::Status {
            url: "https://example.test/tips.csv".to_string(),
            status: 503,
        };
        assert!(err.is_retryable());
    }
}
