//! In-memory backend and fixtures shared by the unit tests.

use std::sync::{Mutex, PoisonError};

use product_search_client::SearchClientError;
use product_search_client::types::{
    Product, ProductQuery, ProductSearchResponse, SearchRequest,
};
use reqwest::StatusCode;

use crate::backend::SearchBackend;

pub(crate) fn product(id: &str, category: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        category: category.to_string(),
        brand: None,
        color: None,
        price: None,
        description: None,
        image_path: None,
        image_url: None,
        image_url_local: None,
        available: Some(true),
        similarity: None,
        similarity_percentage: None,
    }
}

pub(crate) fn scored(id: &str, similarity: f64) -> Product {
    Product {
        similarity: Some(similarity),
        ..product(id, "A")
    }
}

pub(crate) fn search_response(query_id: &str, results: Vec<Product>) -> ProductSearchResponse {
    ProductSearchResponse {
        query_id: query_id.to_string(),
        total: results.len() as u64,
        results,
        timestamp: None,
    }
}

/// A `reqwest` error that never got a response; built without touching the
/// network.
pub(crate) fn transport_error() -> SearchClientError {
    match reqwest::Client::new().get("not a url").build() {
        Err(e) => SearchClientError::Transport(e),
        Ok(_) => unreachable!("relative URL must not build"),
    }
}

#[derive(Debug, Clone)]
pub(crate) enum SearchReply {
    Found(ProductSearchResponse),
    Status(u16, &'static str),
    Transport,
    Malformed,
}

impl SearchReply {
    fn produce(&self) -> Result<ProductSearchResponse, SearchClientError> {
        match self {
            Self::Found(resp) => Ok(resp.clone()),
            Self::Status(code, body) => Err(SearchClientError::http_status(
                StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "http://fake/api/search",
                body.to_string(),
            )),
            Self::Transport => Err(transport_error()),
            Self::Malformed => Err(SearchClientError::Decode {
                url: "http://fake/api/search".into(),
                reason: "missing field `results`".into(),
            }),
        }
    }
}

/// Records every call and answers from canned data.
#[derive(Debug)]
pub(crate) struct FakeBackend {
    pub categories: Vec<String>,
    pub products: Vec<Product>,
    pub related: Vec<Product>,
    pub fail_categories: bool,
    pub fail_products: bool,
    pub search: Mutex<SearchReply>,
    pub searches: Mutex<Vec<SearchRequest>>,
    pub product_queries: Mutex<Vec<ProductQuery>>,
    pub related_calls: Mutex<Vec<(String, u32)>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            products: Vec::new(),
            related: Vec::new(),
            fail_categories: false,
            fail_products: false,
            search: Mutex::new(SearchReply::Found(search_response("default-query", Vec::new()))),
            searches: Mutex::new(Vec::new()),
            product_queries: Mutex::new(Vec::new()),
            related_calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_search(self, reply: SearchReply) -> Self {
        self.set_search(reply);
        self
    }

    pub fn set_search(&self, reply: SearchReply) {
        *self.search.lock().unwrap_or_else(PoisonError::into_inner) = reply;
    }

    pub fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn product_queries(&self) -> Vec<ProductQuery> {
        self.product_queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn related_calls(&self) -> Vec<(String, u32)> {
        self.related_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SearchBackend for FakeBackend {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, SearchClientError> {
        self.product_queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if self.fail_products {
            return Err(transport_error());
        }
        Ok(self.products.clone())
    }

    async fn list_categories(&self) -> Result<Vec<String>, SearchClientError> {
        if self.fail_categories {
            return Err(SearchClientError::http_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "http://fake/api/categories",
                String::new(),
            ));
        }
        Ok(self.categories.clone())
    }

    async fn search(&self, req: &SearchRequest) -> Result<ProductSearchResponse, SearchClientError> {
        self.searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());
        let reply = self
            .search
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        reply.produce()
    }

    async fn related_products(
        &self,
        product_id: &str,
        limit: u32,
    ) -> Result<Vec<Product>, SearchClientError> {
        self.related_calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((product_id.to_string(), limit));
        Ok(self.related.iter().take(limit as usize).cloned().collect())
    }
}
