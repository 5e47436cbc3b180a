//! Catalogue browser: the product snapshot fetched at startup, the category
//! list and the category filter.

use product_search_client::client::DEFAULT_RELATED_LIMIT;
use product_search_client::types::{Product, ProductQuery};
use tracing::{error, info, instrument};

use crate::backend::SearchBackend;
use crate::error::{BOOTSTRAP_FAILED, QueryError, QueryResult};

/// Synthetic category that disables filtering.
pub const ALL_CATEGORIES: &str = "All";

/// Number of products fetched by [`CatalogueBrowser::bootstrap`].
pub const INITIAL_PRODUCT_LIMIT: u32 = 12;

#[derive(Debug, Clone)]
pub struct CatalogueBrowser {
    products: Vec<Product>,
    categories: Vec<String>,
    selected: String,
    banner: Option<QueryError>,
}

impl Default for CatalogueBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogueBrowser {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            categories: vec![ALL_CATEGORIES.to_string()],
            selected: ALL_CATEGORIES.to_string(),
            banner: None,
        }
    }

    /// Loads categories and the first page of products concurrently.
    ///
    /// Either call failing fails the whole bootstrap: the browser keeps its
    /// previous contents and a [`QueryError::Bootstrap`] banner is set. A
    /// later successful bootstrap clears the banner.
    #[instrument(skip_all)]
    pub async fn bootstrap<B: SearchBackend>(&mut self, backend: &B) -> QueryResult<()> {
        let query = ProductQuery::limited(INITIAL_PRODUCT_LIMIT);
        let loaded = tokio::try_join!(backend.list_categories(), backend.list_products(&query));

        match loaded {
            Ok((categories, products)) => {
                self.categories = normalize_categories(categories);
                self.products = products;
                self.banner = None;
                info!(
                    categories = self.categories.len(),
                    products = self.products.len(),
                    "catalogue loaded"
                );
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "catalogue bootstrap failed");
                let banner = QueryError::Bootstrap(BOOTSTRAP_FAILED.to_string());
                self.banner = Some(banner.clone());
                Err(banner)
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Bootstrap failure to show above everything else, if any.
    pub fn banner(&self) -> Option<&QueryError> {
        self.banner.as_ref()
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.selected = category.into();
    }

    /// Products visible under the current selection.
    pub fn filtered(&self) -> Vec<&Product> {
        filtered_catalogue(&self.products, &self.selected)
    }

    /// Fetches products related to `product_id`.
    pub async fn related<B: SearchBackend>(
        &self,
        backend: &B,
        product_id: &str,
        limit: Option<u32>,
    ) -> QueryResult<Vec<Product>> {
        backend
            .related_products(product_id, limit.unwrap_or(DEFAULT_RELATED_LIMIT))
            .await
            .map_err(|err| QueryError::from_fetch("related products", err))
    }
}

/// Full catalogue for [`ALL_CATEGORIES`], otherwise the items whose category
/// equals `selected` ignoring case.
pub fn filtered_catalogue<'a>(products: &'a [Product], selected: &str) -> Vec<&'a Product> {
    if selected == ALL_CATEGORIES {
        return products.iter().collect();
    }
    let wanted = selected.to_lowercase();
    products
        .iter()
        .filter(|p| p.category.to_lowercase() == wanted)
        .collect()
}

/// Puts `All` first and drops duplicates and blanks, keeping service order.
pub fn normalize_categories(fetched: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(fetched.len() + 1);
    out.push(ALL_CATEGORIES.to_string());
    for category in fetched {
        if !category.trim().is_empty() && !out.contains(&category) {
            out.push(category);
        }
    }
    out
}
