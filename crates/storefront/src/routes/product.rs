//! Product detail: the page shell, the detail fragment and its action panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use fakeshop_core::{Favorites, Product, ProductId};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::FilterContext;
use crate::routes::listing::HeartView;
use crate::routes::nav::NavView;
use crate::state::AppState;
use crate::storage::BrowserStorage;

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub image: String,
    pub price: String,
    pub description: String,
    pub rating_rate: f64,
    pub rating_count: u32,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            rating_rate: product.rating.rate,
            rating_count: product.rating.count,
        }
    }
}

/// Action panel state: add-to-cart button and favorite toggle.
#[derive(Clone, Copy)]
pub struct ActionPanelView {
    pub product_id: ProductId,
    pub added: bool,
    pub heart: HeartView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product/show.html")]
pub struct ProductShowTemplate {
    pub nav: NavView,
    pub id: String,
}

/// Product detail fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_detail.html")]
pub struct ProductDetailTemplate {
    pub product: ProductDetailView,
    pub panel: ActionPanelView,
}

/// Not-found fragment template with a retry button (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_not_found.html")]
pub struct ProductNotFoundTemplate {
    pub id: String,
}

/// Display the product detail page shell.
///
/// The detail itself is loaded by HTMX from [`details`] so the spinner shows
/// while the catalog is queried. Like the listing shell, it assigns the
/// browser identity before any fragment is requested.
#[instrument(skip(state, filter, storage), fields(browser = %storage.browser()))]
pub async fn show(
    State(state): State<AppState>,
    filter: FilterContext,
    storage: BrowserStorage,
    Path(id): Path<String>,
) -> impl IntoResponse {
    ProductShowTemplate {
        nav: NavView::new(&filter, state.config()),
        id: encode_segment(&id),
    }
}

/// Product detail fragment (HTMX).
///
/// A non-integer id and an absent product both render the not-found panel.
#[instrument(skip(state, storage))]
pub async fn details(
    State(state): State<AppState>,
    storage: BrowserStorage,
    Path(id): Path<String>,
) -> Result<Response> {
    let product = match id.parse::<ProductId>() {
        Ok(product_id) => state.catalog().get_product(product_id).await,
        Err(_) => {
            tracing::debug!(id = %id, "Product id is not an integer");
            None
        }
    };

    let Some(product) = product else {
        return Ok(ProductNotFoundTemplate {
            id: encode_segment(&id),
        }
        .into_response());
    };

    let favorites: Favorites = storage.load().await?;
    let panel = ActionPanelView {
        product_id: product.id,
        added: false,
        heart: HeartView {
            product_id: product.id,
            favorite: favorites.contains(product.id),
        },
    };

    Ok(ProductDetailTemplate {
        product: ProductDetailView::from(&product),
        panel,
    }
    .into_response())
}

/// Percent-encode a raw path segment for reuse in fragment URLs.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fakeshop_core::{Price, Rating};

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(9),
            title: "Portable SSD".to_string(),
            price: Price::from_cents(6400),
            category: "electronics".to_string(),
            image: "https://img.test/9.png".to_string(),
            description: "Fast storage".to_string(),
            rating: Rating {
                rate: 4.8,
                count: 400,
            },
        }
    }

    #[test]
    fn test_detail_renders_rating_and_panel() {
        let product = product();
        let html = ProductDetailTemplate {
            product: ProductDetailView::from(&product),
            panel: ActionPanelView {
                product_id: product.id,
                added: false,
                heart: HeartView {
                    product_id: product.id,
                    favorite: true,
                },
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("Portable SSD"));
        assert!(html.contains("4.8"));
        assert!(html.contains("(400 reviews)"));
        assert!(html.contains("Add to Cart"));
        assert!(html.contains("Favorited"));
    }

    #[test]
    fn test_not_found_offers_retry() {
        let html = ProductNotFoundTemplate {
            id: "abc".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Failed to load product"));
        assert!(html.contains("Retry"));
        assert!(html.contains("/product/abc/details"));
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("12"), "12");
        assert_eq!(encode_segment("a b\"<"), "a%20b%22%3C");
    }
}
