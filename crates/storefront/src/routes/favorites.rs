//! Favorite toggling.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{AppendHeaders, IntoResponse, Response},
};
use fakeshop_core::{Favorites, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::listing::HeartView;
use crate::storage::{BrowserStorage, CollectionKind};

/// Which control asked for the toggle; the response re-renders that control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleView {
    /// Heart icon on a listing card.
    #[default]
    Grid,
    /// Favorite button in the product action panel.
    Panel,
}

/// Toggle favorite form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub view: ToggleView,
}

/// Card heart fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorite_heart.html")]
pub struct FavoriteHeartTemplate {
    pub heart: HeartView,
}

/// Action panel favorite button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorite_button.html")]
pub struct FavoriteButtonTemplate {
    pub heart: HeartView,
}

/// Toggle a product's favorite membership (HTMX).
///
/// Returns the requesting control in its new state with
/// `HX-Trigger: favorites-updated`.
#[instrument(skip(storage), fields(browser = %storage.browser()))]
pub async fn toggle(
    storage: BrowserStorage,
    Form(form): Form<ToggleFavoriteForm>,
) -> Result<Response> {
    let favorite = storage
        .modify(|favorites: &mut Favorites| Some(favorites.toggle(form.product_id)))
        .await?
        .unwrap_or_default();

    let heart = HeartView {
        product_id: form.product_id,
        favorite,
    };
    let trigger = AppendHeaders([("HX-Trigger", CollectionKind::Favorites.event_name())]);

    Ok(match form.view {
        ToggleView::Grid => (trigger, FavoriteHeartTemplate { heart }).into_response(),
        ToggleView::Panel => (trigger, FavoriteButtonTemplate { heart }).into_response(),
    })
}
