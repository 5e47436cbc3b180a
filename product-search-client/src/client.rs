//! Thin client for the product search API.
//!
//! Endpoints used:
//!   * GET  /api/products?category&available&limit
//!   * GET  /api/categories
//!   * POST /api/search (multipart)
//!   * GET  /api/products/:id/related?limit
//!
//! The client is stateless apart from the pooled HTTP connection; every call
//! maps one request to one typed response.
//!
//! # Examples
//!
//! ```no_run
//! use product_search_client::client::ProductApiClient;
//! use product_search_client::config::client_config::ClientConfig;
//! use product_search_client::types::{SearchImage, SearchRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ProductApiClient::new(ClientConfig::new("http://localhost:8000"))?;
//! let categories = client.list_categories().await?;
//! println!("{} categories", categories.len());
//!
//! let found = client
//!     .search(&SearchRequest {
//!         image: SearchImage::Url("https://example.com/chair.jpg".into()),
//!         top_k: 12,
//!         similarity_threshold: 0.0,
//!     })
//!     .await?;
//! println!("query {} -> {} results", found.query_id, found.results.len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::config::client_config::ClientConfig;
use crate::error_handler::{Result, SearchClientError, make_snippet};
use crate::types::{
    CategoryResponse, Product, ProductListResponse, ProductQuery, ProductSearchResponse,
    SearchImage, SearchRequest,
};

/// Default number of related products requested.
pub const DEFAULT_RELATED_LIMIT: u32 = 6;

/// HTTP client wrapper for the product search service.
#[derive(Debug, Clone)]
pub struct ProductApiClient {
    http: reqwest::Client,
    base: String,
}

impl ProductApiClient {
    /// Creates a new client from the given config.
    ///
    /// Every request carries `Accept: application/json`. A timeout is applied
    /// only when `cfg.timeout_secs` is set.
    ///
    /// # Errors
    /// - [`SearchClientError::Config`] if the base URL is not http(s)
    /// - [`SearchClientError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: ClientConfig) -> Result<Self> {
        crate::error_handler::validate_http_endpoint("PRODUCT_API_URL", &cfg.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        let base = cfg.normalized_base();
        debug!(%base, timeout_secs = ?cfg.timeout_secs, "ProductApiClient initialized");

        Ok(Self { http, base })
    }

    /// Base URL the client talks to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Lists catalogue products, optionally filtered.
    ///
    /// # Errors
    /// - [`SearchClientError::HttpStatus`] for non-2xx responses
    /// - [`SearchClientError::Transport`] for client errors
    /// - [`SearchClientError::Decode`] if the body breaks the contract
    #[instrument(skip_all, fields(limit = ?query.limit, category = ?query.category))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let url = format!("{}/api/products", self.base);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await?;
        let out: ProductListResponse = decode(resp, url).await?;
        debug!(count = out.products.len(), "products received");
        Ok(out.products)
    }

    /// Lists the category taxonomy as returned by the service.
    #[instrument(skip_all)]
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/categories", self.base);
        debug!("GET {}", url);

        let resp = self.http.get(&url).send().await?;
        let out: CategoryResponse = decode(resp, url).await?;
        debug!(count = out.categories.len(), "categories received");
        Ok(out.categories)
    }

    /// Submits an image similarity search as a multipart form.
    ///
    /// On a non-2xx response the body is kept verbatim in the `body` field of
    /// [`SearchClientError::HttpStatus`] so callers can surface it.
    #[instrument(skip_all, fields(top_k = req.top_k, threshold = req.similarity_threshold))]
    pub async fn search(&self, req: &SearchRequest) -> Result<ProductSearchResponse> {
        let url = format!("{}/api/search", self.base);
        debug!("POST {}", url);

        let resp = self.http.post(&url).multipart(build_form(req)?).send().await?;
        let out: ProductSearchResponse = decode(resp, url).await?;
        debug!(
            query_id = %out.query_id,
            results = out.results.len(),
            "search completed"
        );
        Ok(out)
    }

    /// Lists products related to `product_id`.
    #[instrument(skip_all, fields(product_id = %product_id, limit = limit))]
    pub async fn related_products(&self, product_id: &str, limit: u32) -> Result<Vec<Product>> {
        let url = format!(
            "{}/api/products/{}/related",
            self.base,
            urlencoding::encode(product_id)
        );
        debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        let out: ProductListResponse = decode(resp, url).await?;
        Ok(out.products)
    }
}

/// Builds the multipart body: exactly one image part plus the tuning knobs.
fn build_form(req: &SearchRequest) -> Result<Form> {
    let mut form = Form::new();
    if let SearchImage::File(file) = &req.image {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        form = form.part("file", part);
    }
    for (name, value) in req.text_fields() {
        form = form.text(name, value);
    }
    Ok(form)
}

/// Checks the status and decodes the body against the endpoint contract.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response, url: String) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        error!(
            %url,
            %status,
            snippet = %make_snippet(&body),
            "request returned non-success status"
        );
        return Err(SearchClientError::http_status(status, url, body));
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| SearchClientError::Decode {
        url,
        reason: e.to_string(),
    })
}
