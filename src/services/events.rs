//! Change events and the subscriber registry.
//!
//! Renderers register handlers here and are called synchronously after every
//! queue mutation with the event and the queue's new contents.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{Toast, ToastId};

/// Shared, read-only view of the queue contents in display order.
pub type Snapshot = Arc<[Toast]>;

/// Why a toast left the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Its ttl elapsed.
    Expired,
    /// It was removed explicitly.
    Dismissed,
}

/// A single queue mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    /// A toast was appended.
    Added(ToastId),
    /// A toast was patched in place.
    Updated(ToastId),
    /// A toast was removed.
    Removed {
        id: ToastId,
        reason: RemovalReason,
    },
}

impl ToastEvent {
    /// The ID of the toast this event concerns.
    pub fn id(&self) -> &ToastId {
        match self {
            ToastEvent::Added(id) | ToastEvent::Updated(id) => id,
            ToastEvent::Removed { id, .. } => id,
        }
    }
}

/// Subscriber ID for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Handler called with each event and the snapshot it produced.
pub type EventHandler = Arc<dyn Fn(&ToastEvent, &[Toast]) + Send + Sync>;

/// Registry of synchronous change handlers.
pub(crate) struct Subscribers {
    handlers: Mutex<HashMap<u64, EventHandler>>,
    next_id: AtomicU64,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&ToastEvent, &[Toast]) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(handler));
        SubscriberId(id)
    }

    /// Returns false if the subscriber was not registered.
    pub(crate) fn unsubscribe(&self, subscriber_id: SubscriberId) -> bool {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&subscriber_id.0)
            .is_some()
    }

    /// Calls every handler in subscription order.
    ///
    /// Handlers run without the registry lock held, so they may subscribe,
    /// unsubscribe or mutate the queue.
    pub(crate) fn publish(&self, event: &ToastEvent, snapshot: &Snapshot) {
        let mut handlers: Vec<(u64, EventHandler)> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, handler)| (*id, Arc::clone(handler)))
            .collect();
        handlers.sort_by_key(|(id, _)| *id);

        for (_, handler) in handlers {
            handler(event, snapshot);
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("subscriber_count", &self.count())
            .finish()
    }
}
