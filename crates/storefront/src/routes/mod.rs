//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Listing page shell (?category=)
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (session database)
//!
//! # Products
//! GET  /products/grid          - Product grid fragment (?category=&q=)
//! GET  /product/{id}           - Product detail page shell
//! GET  /product/{id}/details   - Product detail fragment
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Append product (returns button, triggers cart-updated)
//! GET  /cart/button            - Add-to-cart button fragment (?product_id=)
//! POST /cart/update            - Change quantity (returns cart_contents fragment)
//! POST /cart/remove            - Remove rows (returns cart_contents fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Favorites (HTMX fragments)
//! POST /favorites/toggle       - Toggle membership (returns heart or panel button)
//! GET  /favorites/count        - Favorites count badge (fragment)
//!
//! # Notifications
//! GET  /events                 - SSE stream of this browser's collection changes
//! ```

pub mod cart;
pub mod events;
pub mod favorites;
pub mod health;
pub mod listing;
pub mod nav;
pub mod product;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(product::show))
        .route("/{id}/details", get(product::details))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/button", get(cart::add_button))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(nav::cart_count))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(favorites::toggle))
        .route("/count", get(nav::favorites_count))
}

/// Create all storefront page and fragment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::index))
        .route("/products/grid", get(listing::grid))
        .route("/events", get(events::stream_changes))
        .nest("/product", product_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorites_routes())
}
