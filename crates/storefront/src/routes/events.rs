//! Server-sent change stream.
//!
//! Each open tab keeps one `/events` stream. Whenever any tab of the same
//! browser writes its cart or favorites, this stream emits `cart-updated` or
//! `favorites-updated` and the tab's listeners re-read the collection.

use std::convert::Infallible;

use async_stream::stream;
use axum::{
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::Stream;
use tracing::instrument;

use crate::state::AppState;
use crate::storage::{BrowserStorage, Subscription};

/// Stream this browser's collection changes as SSE events.
#[instrument(skip(state, storage), fields(browser = %storage.browser()))]
pub async fn stream_changes(
    State(state): State<AppState>,
    storage: BrowserStorage,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("Change stream opened");
    let subscription = state.changes().subscribe(storage.browser());

    Sse::new(change_events(subscription)).keep_alive(KeepAlive::default())
}

/// Map a subscription onto SSE events named after the changed collection.
fn change_events(mut subscription: Subscription) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        while let Some(kind) = subscription.next().await {
            yield Ok(Event::default().event(kind.event_name()).data(kind.event_name()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::storage::{BrowserId, ChangeBus, ChangeNotice, CollectionKind};

    #[tokio::test]
    async fn test_stream_yields_own_browser_changes() {
        let bus = ChangeBus::new();
        let me = BrowserId::new();
        let other = BrowserId::new();

        let events = change_events(bus.subscribe(me));
        futures::pin_mut!(events);

        bus.publish(ChangeNotice {
            browser: other,
            collection: CollectionKind::Cart,
        });
        bus.publish(ChangeNotice {
            browser: me,
            collection: CollectionKind::Favorites,
        });

        let event = events.next().await.unwrap().unwrap();
        let rendered = format!("{event:?}");
        assert!(rendered.contains("favorites-updated"));
    }

    #[tokio::test]
    async fn test_stream_ends_when_bus_dropped() {
        let bus = ChangeBus::new();
        let events = change_events(bus.subscribe(BrowserId::new()));
        drop(bus);

        futures::pin_mut!(events);
        assert!(events.next().await.is_none());
    }
}
