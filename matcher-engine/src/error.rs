//! User-facing error taxonomy of the matcher engine.
//!
//! Every failure that reaches query or catalogue state is one of these
//! variants; the `Display` text is what the user sees.

use product_search_client::SearchClientError;
use thiserror::Error;
use tracing::warn;

/// Shown when a search fails and the service gave no usable message.
pub const SEARCH_FAILED: &str = "Search failed. Please try again.";

/// Shown as a banner when the initial catalogue load fails.
pub const BOOTSTRAP_FAILED: &str = "Unable to load initial data. Check that the API is running.";

/// Convenient alias for engine results.
pub type QueryResult<T> = Result<T, QueryError>;

/// Input problems detected before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Neither a file nor a non-blank URL was provided.
    #[error("Select an image file or paste an image URL before searching.")]
    NoInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Recovered locally; no network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never got an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response or a payload that broke the endpoint contract.
    #[error("{message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    /// Initial catalogue/category load failed.
    #[error("{0}")]
    Bootstrap(String),

    /// A submission is already in flight for this query.
    #[error("A search is already in progress.")]
    Busy,
}

impl QueryError {
    /// Maps a failed search call.
    ///
    /// The service body is surfaced verbatim when it has any content;
    /// everything else collapses to [`SEARCH_FAILED`]. Details are logged.
    pub fn from_search(err: SearchClientError) -> Self {
        warn!(error = %err, "search request failed");
        match err {
            SearchClientError::HttpStatus { status, body, .. } => Self::Service {
                status: Some(status.as_u16()),
                message: if body.trim().is_empty() {
                    SEARCH_FAILED.to_string()
                } else {
                    body
                },
            },
            SearchClientError::Decode { .. } => Self::Service {
                status: None,
                message: SEARCH_FAILED.to_string(),
            },
            _ => Self::Transport(SEARCH_FAILED.to_string()),
        }
    }

    /// Maps a failed catalogue call, e.g. `what = "related products"`.
    pub fn from_fetch(what: &str, err: SearchClientError) -> Self {
        warn!(error = %err, what, "catalogue request failed");
        match err.status() {
            Some(status) => Self::Service {
                status: Some(status.as_u16()),
                message: format!("Failed to fetch {what} ({})", status.as_u16()),
            },
            None if matches!(err, SearchClientError::Decode { .. }) => Self::Service {
                status: None,
                message: format!("Failed to fetch {what} (invalid response)"),
            },
            None => Self::Transport(format!("Failed to fetch {what}")),
        }
    }

    /// Text to render for this error.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::transport_error;
    use product_search_client::SearchClientError;
    use reqwest::StatusCode;

    #[test]
    fn service_body_is_surfaced_verbatim() {
        let err = QueryError::from_search(SearchClientError::http_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "http://x/api/search",
            "model unavailable".to_string(),
        ));
        assert_eq!(err.user_message(), "model unavailable");
        assert!(matches!(err, QueryError::Service { status: Some(500), .. }));
    }

    #[test]
    fn blank_body_falls_back_to_generic_text() {
        let err = QueryError::from_search(SearchClientError::http_status(
            StatusCode::BAD_GATEWAY,
            "http://x/api/search",
            "  \n".to_string(),
        ));
        assert_eq!(err.user_message(), SEARCH_FAILED);
    }

    #[test]
    fn transport_failures_are_generic() {
        let err = QueryError::from_search(transport_error());
        assert_eq!(err, QueryError::Transport(SEARCH_FAILED.to_string()));
    }

    #[test]
    fn catalogue_failures_name_the_resource() {
        let err = QueryError::from_fetch(
            "products",
            SearchClientError::http_status(
                StatusCode::SERVICE_UNAVAILABLE,
                "http://x/api/products",
                String::new(),
            ),
        );
        assert_eq!(err.user_message(), "Failed to fetch products (503)");
    }
}
