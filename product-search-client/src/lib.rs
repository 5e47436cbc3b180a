//! Typed HTTP client for the product catalogue and image-similarity search API.
//!
//! - [`client::ProductApiClient`] maps the four endpoints to typed calls.
//! - [`types`] holds the wire contracts and request builders.
//! - [`config`] loads client settings from the environment.
//! - [`error_handler`] defines the crate error and env helpers.
//! - [`telemetry`] provides the tracing layer used by the binary.

pub mod client;
pub mod config;
pub mod error_handler;
pub mod telemetry;
pub mod types;

pub use client::ProductApiClient;
pub use error_handler::{Result, SearchClientError};
