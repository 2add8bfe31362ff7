//! Per-request category filter.
//!
//! [`filter_context_middleware`] provisions one [`FilterContext`] per request,
//! seeded from the optional `?category=` query parameter. Handlers and views
//! rendered for that request share the same handle, so a category set by one
//! is observed by the rest immediately.

use std::sync::{Arc, PoisonError, RwLock};

use axum::{
    extract::{FromRequestParts, Query, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use fakeshop_core::Category;
use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;

/// Errors raised when the filter is used without its middleware.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("category filter read outside its provisioning scope")]
    NotProvisioned,
}

/// Shared handle on the active category.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    category: Arc<RwLock<Category>>,
}

impl FilterContext {
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            category: Arc::new(RwLock::new(category)),
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        *self.category.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the active category for the rest of the request.
    ///
    /// Every clone of this handle sees the new value on its next read, so a
    /// handler that switches category before rendering gets a navbar and
    /// links built for the new one. The value is never persisted; the next
    /// request is seeded from its own `?category=` again.
    pub fn set_category(&self, category: Category) {
        *self.category.write().unwrap_or_else(PoisonError::into_inner) = category;
    }
}

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

/// Middleware that provisions the request's [`FilterContext`].
///
/// Unknown category values leave the filter at [`Category::All`].
pub async fn filter_context_middleware(mut request: Request, next: Next) -> Response {
    let category = Query::<CategoryQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.category)
        .and_then(|value| value.parse::<Category>().ok())
        .unwrap_or_default();

    request.extensions_mut().insert(FilterContext::new(category));
    next.run(request).await
}

impl<S> FromRequestParts<S> for FilterContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!(
                path = %parts.uri.path(),
                "Filter context not found in request extensions - middleware may be misconfigured"
            );
            AppError::Filter(FilterError::NotProvisioned)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    async fn echo(filter: FilterContext) -> impl IntoResponse {
        filter.category().as_str()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn provisioned() -> Router {
        Router::new()
            .route("/", get(echo))
            .layer(middleware::from_fn(filter_context_middleware))
    }

    #[test]
    fn test_set_category_is_shared_by_clones() {
        let filter = FilterContext::default();
        let other = filter.clone();
        assert_eq!(other.category(), Category::All);

        filter.set_category(Category::Electronics);
        assert_eq!(other.category(), Category::Electronics);
    }

    #[tokio::test]
    async fn test_seeded_from_query() {
        let response = provisioned()
            .oneshot(
                HttpRequest::get("/?category=women%27s%20clothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "women's clothing");
    }

    async fn switch_to_favorites(filter: FilterContext) -> impl IntoResponse {
        let view = filter.clone();
        filter.set_category(Category::Favorites);
        view.category().as_str()
    }

    #[tokio::test]
    async fn test_set_category_in_handler_is_request_scoped() {
        let app = Router::new()
            .route("/switch", get(switch_to_favorites))
            .route("/", get(echo))
            .layer(middleware::from_fn(filter_context_middleware));

        let response = app
            .clone()
            .oneshot(
                HttpRequest::get("/switch?category=electronics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "favorites");

        let response = app
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "all");
    }

    #[tokio::test]
    async fn test_unknown_category_defaults_to_all() {
        for uri in ["/", "/?category=toys", "/?q=shirt"] {
            let response = provisioned()
                .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(body_string(response).await, "all", "uri {uri}");
        }
    }

    #[tokio::test]
    async fn test_missing_middleware_fails_loudly() {
        let app = Router::new().route("/", get(echo));
        let response = app
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
