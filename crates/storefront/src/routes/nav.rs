//! Navigation bar and its count badges.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use fakeshop_core::{Cart, Category, Favorites};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::middleware::FilterContext;
use crate::storage::BrowserStorage;

/// A category link in the navbar.
#[derive(Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Navbar display data, shared by every page template.
#[derive(Clone)]
pub struct NavView {
    pub links: Vec<NavLink>,
    pub favorites_href: String,
    pub favorites_active: bool,
    pub cart_href: String,
    pub contact_email: String,
}

impl NavView {
    /// Build the navbar for the request's active category.
    #[must_use]
    pub fn new(filter: &FilterContext, config: &StorefrontConfig) -> Self {
        let active = filter.category();

        Self {
            links: Category::TABS
                .iter()
                .map(|&category| NavLink {
                    label: category.label(),
                    href: category_href(category),
                    active: category == active,
                })
                .collect(),
            favorites_href: category_href(Category::Favorites),
            favorites_active: active == Category::Favorites,
            cart_href: scoped_href("/cart", active),
            contact_email: config.contact_email.clone(),
        }
    }
}

/// Listing URL for `category`. `All` is the bare listing.
#[must_use]
pub fn category_href(category: Category) -> String {
    scoped_href("/", category)
}

/// `path` carrying the active category, so the page it leads to keeps the
/// navbar highlight. `All` adds nothing.
#[must_use]
pub fn scoped_href(path: &str, category: Category) -> String {
    if category == Category::All {
        return path.to_string();
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("category", category.as_str())
        .finish();
    format!("{path}?{query}")
}

/// Count badge fragment template (for HTMX). Zero renders nothing.
#[derive(Template, WebTemplate)]
#[template(path = "partials/count_badge.html")]
pub struct CountBadgeTemplate {
    pub count: usize,
}

/// Cart badge: number of cart rows (HTMX).
#[instrument(skip(storage), fields(browser = %storage.browser()))]
pub async fn cart_count(storage: BrowserStorage) -> Result<impl IntoResponse> {
    let cart: Cart = storage.load().await?;
    Ok(CountBadgeTemplate { count: cart.len() })
}

/// Favorites badge: number of favorited products (HTMX).
#[instrument(skip(storage), fields(browser = %storage.browser()))]
pub async fn favorites_count(storage: BrowserStorage) -> Result<impl IntoResponse> {
    let favorites: Favorites = storage.load().await?;
    Ok(CountBadgeTemplate {
        count: favorites.len(),
    })
}
