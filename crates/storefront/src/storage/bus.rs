//! Typed publish/subscribe for collection changes.
//!
//! Every successful collection write publishes one [`ChangeNotice`]. Each
//! open `/events` stream holds a [`Subscription`] filtered to its own
//! browser, which is how tabs other than the one that made the change learn
//! about it.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;

use super::BrowserId;

/// Notices buffered per subscriber before it is considered lagging.
const CHANNEL_CAPACITY: usize = 256;

/// Which persisted collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Cart,
    Favorites,
}

impl CollectionKind {
    /// Event name used for both the `HX-Trigger` header and SSE events.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Cart => "cart-updated",
            Self::Favorites => "favorites-updated",
        }
    }
}

/// A collection of one browser was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice {
    pub browser: BrowserId,
    pub collection: CollectionKind,
}

/// Process-wide change bus.
///
/// Cheaply cloneable; clones publish to and subscribe from the same channel.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<ChangeNotice>,
    closed: Arc<watch::Sender<bool>>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (closed, _) = watch::channel(false);
        Self {
            sender,
            closed: Arc::new(closed),
        }
    }

    /// End every subscription, current and future.
    ///
    /// Called on shutdown so open event streams finish and the server can
    /// drain its connections.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    /// Publish a notice, returning how many subscribers were listening.
    pub fn publish(&self, notice: ChangeNotice) -> usize {
        // No receivers is normal: no tab has an event stream open
        self.sender.send(notice).unwrap_or(0)
    }

    /// Subscribe to the notices of one browser.
    #[must_use]
    pub fn subscribe(&self, browser: BrowserId) -> Subscription {
        Subscription {
            browser,
            receiver: self.sender.subscribe(),
            closed: self.closed.subscribe(),
            pending: None,
        }
    }
}

/// Stream of collection changes for one browser.
#[derive(Debug)]
pub struct Subscription {
    browser: BrowserId,
    receiver: broadcast::Receiver<ChangeNotice>,
    closed: watch::Receiver<bool>,
    pending: Option<CollectionKind>,
}

impl Subscription {
    /// Wait for the next change of this browser's collections.
    ///
    /// After lagging behind the channel, reports both collections as changed
    /// so the consumer re-reads everything. Returns `None` once the bus is
    /// closed or gone.
    pub async fn next(&mut self) -> Option<CollectionKind> {
        if let Some(kind) = self.pending.take() {
            return Some(kind);
        }

        loop {
            let received = tokio::select! {
                received = self.receiver.recv() => received,
                _ = self.closed.wait_for(|closed| *closed) => return None,
            };

            match received {
                Ok(notice) if notice.browser == self.browser => return Some(notice.collection),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, browser = %self.browser, "Change subscriber lagged");
                    self.pending = Some(CollectionKind::Favorites);
                    return Some(CollectionKind::Cart);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
