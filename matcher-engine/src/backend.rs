//! The seam between the engine and the search service.
//!
//! The engine only needs these four calls; [`ProductApiClient`] is the
//! production implementation.

use std::future::Future;

use product_search_client::types::{Product, ProductQuery, ProductSearchResponse, SearchRequest};
use product_search_client::{ProductApiClient, SearchClientError};

type ApiResult<T> = Result<T, SearchClientError>;

pub trait SearchBackend {
    fn list_products(&self, query: &ProductQuery) -> impl Future<Output = ApiResult<Vec<Product>>>;

    fn list_categories(&self) -> impl Future<Output = ApiResult<Vec<String>>>;

    fn search(&self, req: &SearchRequest) -> impl Future<Output = ApiResult<ProductSearchResponse>>;

    fn related_products(
        &self,
        product_id: &str,
        limit: u32,
    ) -> impl Future<Output = ApiResult<Vec<Product>>>;
}

impl SearchBackend for ProductApiClient {
    async fn list_products(&self, query: &ProductQuery) -> ApiResult<Vec<Product>> {
        ProductApiClient::list_products(self, query).await
    }

    async fn list_categories(&self) -> ApiResult<Vec<String>> {
        ProductApiClient::list_categories(self).await
    }

    async fn search(&self, req: &SearchRequest) -> ApiResult<ProductSearchResponse> {
        ProductApiClient::search(self, req).await
    }

    async fn related_products(&self, product_id: &str, limit: u32) -> ApiResult<Vec<Product>> {
        ProductApiClient::related_products(self, product_id, limit).await
    }
}
