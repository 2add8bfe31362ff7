//! Session middleware configuration.
//!
//! The session cookie is the browser's only state; its cart, favorites and
//! identity live server-side in the session store.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fakeshop_session";

/// Create the session layer over `store`.
///
/// Production passes a `SqliteStore`; tests pass a `MemoryStore`.
#[must_use]
pub fn create_session_layer<Store>(
    store: Store,
    config: &StorefrontConfig,
) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    let expiry = tower_sessions::cookie::time::Duration::try_from(config.session.expiry)
        .unwrap_or(tower_sessions::cookie::time::Duration::MAX);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(expiry))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
