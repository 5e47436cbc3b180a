//! Wire data model for the product search API.
//!
//! Response shapes are fixed contracts: required fields must be present or
//! decoding fails. Loosely typed fields (`id`, `price`) are normalized here so
//! nothing past this module has to guess their type.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A catalogue item, optionally annotated with a similarity score when it
/// comes back from a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Parsed at ingestion; `None` when absent or not a finite number.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_url_local: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    /// Relevance in `0.0..=1.0`.
    #[serde(default)]
    pub similarity: Option<f64>,
    /// Relevance in `0.0..=100.0`.
    #[serde(default)]
    pub similarity_percentage: Option<f64>,
}

/// Body of `GET /api/products` and `GET /api/products/{id}/related`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body of `GET /api/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryResponse {
    pub categories: Vec<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSearchResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub query_id: String,
    /// Ranked by the service; order must be preserved.
    pub results: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Optional filters for `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub available: Option<bool>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query filtered to a capped number of items.
    pub fn limited(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Query-string pairs in a stable order; unset and empty values are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(available) = self.available {
            pairs.push(("available", available.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// An image file selected as the query input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name sent in the multipart part.
    pub name: String,
    /// MIME type sent in the multipart part.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name).to_string();
        Self { name, mime, bytes }
    }

    /// Reads an image from disk.
    ///
    /// # Errors
    /// Returns [`SearchClientError::ImageRead`](crate::error_handler::SearchClientError::ImageRead)
    /// when the file cannot be read.
    pub async fn from_path(
        path: impl AsRef<std::path::Path>,
    ) -> crate::error_handler::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            crate::error_handler::SearchClientError::ImageRead {
                path: path.display().to_string(),
                source,
            }
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "query-image".to_string());
        Ok(Self::new(name, bytes))
    }
}

/// The one image source a search request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchImage {
    File(ImageFile),
    Url(String),
}

/// A fully normalized search request.
///
/// `top_k` and `similarity_threshold` are expected to be clamped already.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub image: SearchImage,
    pub top_k: u32,
    /// Fraction in `0.0..=1.0`.
    pub similarity_threshold: f64,
}

impl SearchRequest {
    /// Text parts of the multipart form, in send order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(3);
        if let SearchImage::Url(url) = &self.image {
            fields.push(("image_url", url.clone()));
        }
        fields.push(("top_k", self.top_k.to_string()));
        fields.push(("similarity_threshold", self.similarity_threshold.to_string()));
        fields
    }
}

fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/* ==========================
Lenient field decoders
========================== */

fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn lenient_price<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(coerce_price))
}

/// Coerces a JSON price into a finite number.
///
/// Numbers pass through, numeric strings are parsed after trimming, anything
/// else (including `NaN`/`inf` strings) yields `None`.
pub fn coerce_price(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_is_coerced_on_ingestion() {
        let p: Product = serde_json::from_value(json!({
            "id": 7, "name": "Mug", "category": "Kitchen", "price": " 12.5 "
        }))
        .unwrap();
        assert_eq!(p.id, "7");
        assert_eq!(p.price, Some(12.5));

        let p: Product = serde_json::from_value(json!({
            "id": "a", "name": "Mug", "category": "Kitchen", "price": "call us"
        }))
        .unwrap();
        assert_eq!(p.price, None);

        let p: Product = serde_json::from_value(json!({
            "id": "a", "name": "Mug", "category": "Kitchen", "price": null
        }))
        .unwrap();
        assert_eq!(p.price, None);

        assert_eq!(coerce_price(&json!("NaN")), None);
        assert_eq!(coerce_price(&json!(true)), None);
    }

    #[test]
    fn search_response_requires_results() {
        let err = serde_json::from_value::<ProductSearchResponse>(json!({ "query_id": "q" }));
        assert!(err.is_err());

        let ok: ProductSearchResponse = serde_json::from_value(json!({
            "query_id": "abc",
            "results": [{ "id": "p1", "name": "Chair", "category": "Furniture", "similarity": 0.87 }],
            "total": 1,
            "timestamp": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(ok.results[0].similarity, Some(0.87));
        assert_eq!(ok.results[0].similarity_percentage, None);
    }

    #[test]
    fn query_pairs_skip_empty_values() {
        let q = ProductQuery {
            category: Some(String::new()),
            available: Some(true),
            limit: Some(12),
        };
        assert_eq!(
            q.query_pairs(),
            vec![("available", "true".to_string()), ("limit", "12".to_string())]
        );
        assert!(ProductQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn url_request_fields() {
        let req = SearchRequest {
            image: SearchImage::Url("http://x/y.jpg".into()),
            top_k: 24,
            similarity_threshold: 1.0,
        };
        assert_eq!(
            req.text_fields(),
            vec![
                ("image_url", "http://x/y.jpg".to_string()),
                ("top_k", "24".to_string()),
                ("similarity_threshold", "1".to_string()),
            ]
        );
    }

    #[test]
    fn file_request_has_no_url_field() {
        let req = SearchRequest {
            image: SearchImage::File(ImageFile::new("shoe.PNG", vec![1, 2, 3])),
            top_k: 12,
            similarity_threshold: 0.25,
        };
        let fields = req.text_fields();
        assert!(fields.iter().all(|(k, _)| *k != "image_url"));
        assert_eq!(fields[1], ("similarity_threshold", "0.25".to_string()));
        if let SearchImage::File(f) = &req.image {
            assert_eq!(f.mime, "image/png");
        }
    }
}
