//! Display formatting for matches and catalogue rows. Pure functions only.

use product_search_client::types::Product;

/// Image shown when a product has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub const PRICE_ON_REQUEST: &str = "Price on request";
pub const UNBRANDED: &str = "Unbranded";
pub const NO_DESCRIPTION: &str = "No description available for this product yet.";
pub const NO_IMAGE: &str = "No image";
pub const EMPTY_CATEGORY: &str = "No catalogue entries for this category yet.";
pub const NO_RELATED: &str = "No related products found.";
pub const RESULTS_HINT: &str = "Matches are sorted by cosine similarity.";
pub const NO_RESULTS_HINT: &str = "Run a search to see visually similar items.";

/// Number of query id characters shown in the results header.
const QUERY_ID_PREFIX: usize = 8;

/// `image_url_local`, then `image_url`, then the placeholder.
pub fn image_source(product: &Product) -> &str {
    product_image(product).unwrap_or(PLACEHOLDER_IMAGE)
}

/// e.g. `"87.0% match"`; `None` when the product carries no score.
pub fn similarity_label(product: &Product) -> Option<String> {
    let percent = product
        .similarity_percentage
        .or_else(|| product.similarity.map(|s| s * 100.0))?;
    Some(format!("{:.1}% match", round_half_up(percent, 10.0)))
}

/// Two-decimal dollar amount, or [`PRICE_ON_REQUEST`].
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) if value.is_finite() => format!("${:.2}", round_half_up(value, 100.0)),
        _ => PRICE_ON_REQUEST.to_string(),
    }
}

/// e.g. `"Query #abc123de"`.
pub fn query_label(query_id: &str) -> String {
    let short: String = query_id.chars().take(QUERY_ID_PREFIX).collect();
    format!("Query #{short}")
}

/// Header hint under the results title.
pub fn results_hint(result_count: usize) -> &'static str {
    if result_count > 0 {
        RESULTS_HINT
    } else {
        NO_RESULTS_HINT
    }
}

/// Empty-state line for a related-products list.
pub fn related_hint(related_count: usize) -> Option<&'static str> {
    (related_count == 0).then_some(NO_RELATED)
}

/// Everything needed to render one search match.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub id: String,
    pub name: String,
    pub image: String,
    pub similarity: Option<String>,
    pub brand: String,
    pub description: String,
    pub price: String,
    pub category: String,
    /// Link to the original image, when the service provided one.
    pub original_image: Option<String>,
}

impl ResultCard {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: image_source(product).to_string(),
            similarity: similarity_label(product),
            brand: product.brand.clone().unwrap_or_else(|| UNBRANDED.to_string()),
            description: product
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            price: format_price(product.price),
            category: product.category.clone(),
            original_image: product.image_url.clone(),
        }
    }
}

/// Compact catalogue list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueRow {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Thumbnail source, or [`NO_IMAGE`] text when there is none.
    pub thumbnail: Result<String, &'static str>,
}

impl CatalogueRow {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            thumbnail: product_image(product)
                .map(str::to_string)
                .ok_or(NO_IMAGE),
        }
    }
}

/// Rounds ties away from zero at `1 / scale`; `format!` alone rounds them to even.
fn round_half_up(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

fn product_image(product: &Product) -> Option<&str> {
    product
        .image_url_local
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| product.image_url.as_deref().filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product, scored};
    use product_search_client::types::ProductSearchResponse;

    #[test]
    fn image_source_prefers_local_copy() {
        let mut p = product("p1", "Lamps");
        assert_eq!(image_source(&p), PLACEHOLDER_IMAGE);

        p.image_url = Some("https://cdn/x.jpg".into());
        assert_eq!(image_source(&p), "https://cdn/x.jpg");

        p.image_url_local = Some("/static/x.jpg".into());
        assert_eq!(image_source(&p), "/static/x.jpg");
    }

    #[test]
    fn similarity_label_prefers_percentage() {
        let mut p = scored("p1", 0.87);
        assert_eq!(similarity_label(&p).as_deref(), Some("87.0% match"));

        p.similarity_percentage = Some(91.25);
        assert_eq!(similarity_label(&p).as_deref(), Some("91.3% match"));

        p.similarity_percentage = Some(0.05);
        assert_eq!(similarity_label(&p).as_deref(), Some("0.1% match"));

        assert_eq!(similarity_label(&product("p2", "A")), None);
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(Some(12.5)), "$12.50");
        assert_eq!(format_price(Some(0.0)), "$0.00");
        assert_eq!(format_price(Some(12.125)), "$12.13");
        assert_eq!(format_price(Some(0.125)), "$0.13");
        assert_eq!(format_price(Some(2.5)), "$2.50");
        assert_eq!(format_price(None), PRICE_ON_REQUEST);
        assert_eq!(format_price(Some(f64::NAN)), PRICE_ON_REQUEST);
        assert_eq!(format_price(Some(f64::INFINITY)), PRICE_ON_REQUEST);
    }

    #[test]
    fn query_label_uses_first_eight_chars() {
        assert_eq!(query_label("abc123def456"), "Query #abc123de");
        assert_eq!(query_label("abc"), "Query #abc");
    }

    #[test]
    fn card_fallbacks() {
        let card = ResultCard::from_product(&scored("p1", 0.87));
        assert_eq!(card.similarity.as_deref(), Some("87.0% match"));
        assert_eq!(card.brand, UNBRANDED);
        assert_eq!(card.description, NO_DESCRIPTION);
        assert_eq!(card.price, PRICE_ON_REQUEST);
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
        assert_eq!(card.original_image, None);
    }

    #[test]
    fn card_from_decoded_search_result() {
        let response: ProductSearchResponse = serde_json::from_value(serde_json::json!({
            "query_id": "abc123def456",
            "results": [{
                "id": 42,
                "name": "Desk Lamp",
                "category": "Lamps",
                "brand": "Lumo",
                "price": "12.125",
                "image_url": "https://cdn/lamp.jpg",
                "similarity_percentage": 91.25
            }],
            "total": 1
        }))
        .unwrap();

        let card = ResultCard::from_product(&response.results[0]);
        assert_eq!(card.id, "42");
        assert_eq!(card.brand, "Lumo");
        assert_eq!(card.price, "$12.13");
        assert_eq!(card.similarity.as_deref(), Some("91.3% match"));
        assert_eq!(card.image, "https://cdn/lamp.jpg");
        assert_eq!(card.original_image.as_deref(), Some("https://cdn/lamp.jpg"));
        assert_eq!(query_label(&response.query_id), "Query #abc123de");
    }

    #[test]
    fn catalogue_row_without_image() {
        let row = CatalogueRow::from_product(&product("p1", "Lamps"));
        assert_eq!(row.thumbnail, Err(NO_IMAGE));
        assert_eq!(results_hint(0), NO_RESULTS_HINT);
        assert_eq!(results_hint(3), RESULTS_HINT);
    }

    #[test]
    fn empty_related_list_has_its_own_text() {
        assert_eq!(related_hint(0), Some("No related products found."));
        assert_ne!(related_hint(0), Some(EMPTY_CATEGORY));
        assert_eq!(related_hint(2), None);
    }
}
