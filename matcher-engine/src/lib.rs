//! Query lifecycle engine for visual product-similarity search.
//!
//! The engine owns everything between user input and the search service:
//! the file/URL input and its preview, parameter normalization, the query
//! state machine, the catalogue snapshot and the text shown for results.
//! It talks to the service through [`SearchBackend`], implemented for
//! [`product_search_client::ProductApiClient`].
//!
//! ```no_run
//! use matcher_engine::{CatalogueBrowser, PreviewRegistry, QueryExecutor};
//! use product_search_client::ProductApiClient;
//! use product_search_client::config::default_config::config_with_base;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ProductApiClient::new(config_with_base("http://localhost:8000")?)?;
//!
//! let mut catalogue = CatalogueBrowser::new();
//! let _ = catalogue.bootstrap(&client).await;
//!
//! let mut query = QueryExecutor::new(client, PreviewRegistry::new());
//! query.set_url("https://example.com/chair.jpg");
//! query.set_top_k(6.0);
//! query.submit().await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod catalogue;
pub mod error;
pub mod executor;
pub mod input;
pub mod params;
pub mod presenter;
pub mod preview;
pub mod state;

#[cfg(test)]
mod testing;

pub use backend::SearchBackend;
pub use catalogue::CatalogueBrowser;
pub use error::{QueryError, QueryResult, ValidationError};
pub use executor::{PendingSearch, QueryExecutor};
pub use input::{InputManager, InputMode};
pub use preview::{PreviewRegistry, PreviewResource};
pub use state::{QueryEvent, QueryState, QueryStatus, Transition};
