//! Browser identity and the per-request storage handle.

use core::fmt;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::debug;
use uuid::Uuid;

use super::{ChangeBus, ChangeNotice, Collection, KeyValueStore, StorageError};
use crate::error::AppError;
use crate::state::AppState;

/// Session key holding the browser's identity.
pub const BROWSER_ID_KEY: &str = "browser_id";

/// Stable identity of one browser, shared by all of its tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrowserId(Uuid);

impl BrowserId {
    /// Generate a new random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Read the identity stored in `session`, assigning one on first visit.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn for_session(session: &Session) -> Result<Self, StorageError> {
        if let Some(id) = session.get::<Self>(BROWSER_ID_KEY).await? {
            return Ok(id);
        }

        let id = Self::new();
        session.insert(BROWSER_ID_KEY, id).await?;
        debug!(browser = %id, "Assigned browser identity");
        Ok(id)
    }
}

impl Default for BrowserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One browser's persisted collections.
///
/// Extract it in a handler to read or mutate the requesting browser's cart
/// and favorites:
///
/// ```rust,ignore
/// async fn handler(storage: BrowserStorage) -> Result<impl IntoResponse> {
///     let cart: Cart = storage.load().await?;
///     // ...
/// }
/// ```
pub struct BrowserStorage<S = Session> {
    store: S,
    browser: BrowserId,
    bus: ChangeBus,
}

impl<S: KeyValueStore> BrowserStorage<S> {
    #[must_use]
    pub const fn new(store: S, browser: BrowserId, bus: ChangeBus) -> Self {
        Self {
            store,
            browser,
            bus,
        }
    }

    #[must_use]
    pub const fn browser(&self) -> BrowserId {
        self.browser
    }

    /// Read a collection. Absent or unreadable values read as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub async fn load<C: Collection>(&self) -> Result<C, StorageError> {
        let Some(value) = self.store.load_value(C::KEY).await? else {
            return Ok(C::default());
        };

        match serde_json::from_value(value) {
            Ok(collection) => Ok(collection),
            Err(e) => {
                tracing::warn!(
                    key = C::KEY,
                    browser = %self.browser,
                    error = %e,
                    "Discarding unreadable stored collection"
                );
                Ok(C::default())
            }
        }
    }

    /// Read-modify-write a collection.
    ///
    /// `mutate` returns `None` to reject the change: nothing is written and
    /// nothing is published. Otherwise the whole collection is written back
    /// and a [`ChangeNotice`] is published.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub async fn modify<C, R, F>(&self, mutate: F) -> Result<Option<R>, StorageError>
    where
        C: Collection,
        F: FnOnce(&mut C) -> Option<R> + Send,
        R: Send,
    {
        let mut collection = self.load::<C>().await?;

        let Some(outcome) = mutate(&mut collection) else {
            debug!(key = C::KEY, browser = %self.browser, "Collection change rejected");
            return Ok(None);
        };

        self.store
            .store_value(C::KEY, serde_json::to_value(&collection)?)
            .await?;

        self.bus.publish(ChangeNotice {
            browser: self.browser,
            collection: C::KIND,
        });
        debug!(
            key = C::KEY,
            browser = %self.browser,
            len = collection.len(),
            "Collection written"
        );

        Ok(Some(outcome))
    }
}

impl FromRequestParts<AppState> for BrowserStorage<Session> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        // Session is set in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let browser = BrowserId::for_session(&session).await?;

        Ok(Self::new(session, browser, state.changes().clone()))
    }
}
