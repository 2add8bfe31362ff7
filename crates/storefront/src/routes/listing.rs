//! Product listing: the page shell and the grid fragment it loads.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use fakeshop_core::{Category, Favorites, Product, ProductId, ProductQuery};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::FilterContext;
use crate::routes::nav::{NavView, scoped_href};
use crate::state::AppState;
use crate::storage::BrowserStorage;

/// Placeholder cards shown while the grid loads.
pub const SKELETON_CARDS: usize = 8;

/// Heart toggle state for one product card.
#[derive(Clone, Copy)]
pub struct HeartView {
    pub product_id: ProductId,
    pub favorite: bool,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub href: String,
    pub title: String,
    pub category: String,
    pub image: String,
    pub price: String,
    pub heart: HeartView,
}

impl ProductCardView {
    fn new(product: &Product, favorites: &Favorites, category: Category) -> Self {
        Self {
            id: product.id,
            href: scoped_href(&format!("/product/{}", product.id), category),
            title: product.title.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
            heart: HeartView {
                product_id: product.id,
                favorite: favorites.contains(product.id),
            },
        }
    }
}

/// Listing query parameters. `category` is read by the filter middleware.
#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    #[serde(default)]
    pub q: String,
}

/// Listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "listing/index.html")]
pub struct ListingTemplate {
    pub nav: NavView,
    pub category: &'static str,
    pub favorites_view: bool,
    pub skeleton_cards: usize,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<ProductCardView>,
}

/// Catalog failure fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/listing_error.html")]
pub struct ListingErrorTemplate;

/// Empty favorites fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/empty_favorites.html")]
pub struct EmptyFavoritesTemplate;

/// Display the listing page shell.
///
/// The grid itself is loaded by HTMX from [`grid`] so the skeleton shows
/// while the catalog is fetched. Extracting [`BrowserStorage`] assigns the
/// browser identity here, so the fragments the shell loads in parallel all
/// share one session.
#[instrument(
    skip(state, filter, storage),
    fields(category = %filter.category(), browser = %storage.browser())
)]
pub async fn index(
    State(state): State<AppState>,
    filter: FilterContext,
    storage: BrowserStorage,
) -> impl IntoResponse {
    let category = filter.category();

    ListingTemplate {
        nav: NavView::new(&filter, state.config()),
        category: category.as_str(),
        favorites_view: category == Category::Favorites,
        skeleton_cards: SKELETON_CARDS,
    }
}

/// Product grid fragment (HTMX).
///
/// Renders exactly one of: the catalog failure message, the empty favorites
/// state, or the cards matching both the search text and the category.
#[instrument(skip(state, filter, storage), fields(category = %filter.category()))]
pub async fn grid(
    State(state): State<AppState>,
    filter: FilterContext,
    storage: BrowserStorage,
    Query(query): Query<GridQuery>,
) -> Result<Response> {
    let products = match state.catalog().list_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load products");
            return Ok(ListingErrorTemplate.into_response());
        }
    };

    let favorites: Favorites = storage.load().await?;
    let category = filter.category();

    if category == Category::Favorites && favorites.is_empty() {
        return Ok(EmptyFavoritesTemplate.into_response());
    }

    let cards = ProductQuery::new(category, query.q)
        .apply(&products, &favorites)
        .into_iter()
        .map(|product| ProductCardView::new(product, &favorites, category))
        .collect();

    Ok(ProductGridTemplate { cards }.into_response())
}
