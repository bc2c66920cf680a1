//! Toast queue service.
//!
//! [`ToastQueue`] owns the ordered list of active toasts and one expiry timer
//! per toast with a finite ttl. Every mutation publishes the new contents to
//! watchers and subscribers before it returns.
//!
//! Timers are Tokio tasks holding a weak reference to the queue. Each timer
//! carries a generation number, and an expiry only removes its toast if the
//! toast still holds that generation, so a timer that was already running
//! when the toast was removed or rescheduled does nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::events::{RemovalReason, Snapshot, SubscriberId, Subscribers, ToastEvent};
use crate::config::ToastSettings;
use crate::domain::{DismissHook, Severity, Toast, ToastId, ToastPatch, ToastSpec, Ttl};

/// Errors that can occur while setting up a toast queue.
#[derive(Debug, Error)]
pub enum ToastError {
    /// The queue was created outside a Tokio runtime.
    #[error("toast queue requires a Tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Result type for toast queue operations.
pub type ToastResult<T> = Result<T, ToastError>;

/// Pending expiry of one toast.
struct ExpiryTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl ExpiryTimer {
    fn cancel(self) {
        self.handle.abort();
    }
}

struct Entry {
    toast: Toast,
    on_dismiss: Option<DismissHook>,
    timer: Option<ExpiryTimer>,
}

impl Entry {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[derive(Default)]
struct QueueState {
    entries: Vec<Entry>,
    closed: bool,
}

impl QueueState {
    fn position(&self, id: &ToastId) -> Option<usize> {
        self.entries.iter().position(|e| &e.toast.id == id)
    }

    fn snapshot(&self) -> Snapshot {
        self.entries.iter().map(|e| e.toast.clone()).collect()
    }
}

struct Inner {
    state: Mutex<QueueState>,
    default_ttl: Duration,
    runtime: Handle,
    next_generation: AtomicU64,
    subscribers: Subscribers,
    watch_tx: watch::Sender<Snapshot>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for entry in state.entries.iter_mut() {
            entry.cancel_timer();
        }
    }
}

/// Ordered queue of active toasts with auto-dismiss timers.
///
/// Cloning is cheap and every clone refers to the same queue.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Inner>,
}

impl ToastQueue {
    /// Creates a queue whose timers run on the current Tokio runtime.
    pub fn new(settings: &ToastSettings) -> ToastResult<Self> {
        Ok(Self::with_runtime(settings, Handle::try_current()?))
    }

    /// Creates a queue whose timers run on `runtime`.
    pub fn with_runtime(settings: &ToastSettings, runtime: Handle) -> Self {
        let (watch_tx, _) = watch::channel(Snapshot::from(Vec::new()));
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(QueueState::default()),
                default_ttl: settings.default_ttl(),
                runtime,
                next_generation: AtomicU64::new(0),
                subscribers: Subscribers::new(),
                watch_tx,
            }),
        }
    }

    /// Appends a toast and returns its ID.
    ///
    /// A toast without a ttl gets the configured default. Returns
    /// [`ToastId::empty`] if the queue has been shut down.
    pub fn add(&self, spec: ToastSpec) -> ToastId {
        let id = ToastId::generate();
        let (toast, on_dismiss) = spec.into_toast(id.clone(), self.inner.default_ttl);
        let ttl = toast.ttl;

        let snapshot = {
            let mut state = self.lock();
            if state.closed {
                tracing::warn!("Toast queue has been shut down, dropping toast");
                return ToastId::empty();
            }
            let timer = self.schedule(&id, ttl);
            state.entries.push(Entry {
                toast,
                on_dismiss,
                timer,
            });
            self.commit(&state)
        };

        tracing::debug!(id = %id, ttl = ?ttl, "Toast added");
        self.inner
            .subscribers
            .publish(&ToastEvent::Added(id.clone()), &snapshot);
        id
    }

    /// Appends a toast with `severity` preset.
    ///
    /// The preset replaces any severity already set on `spec`.
    pub fn add_with_severity(&self, severity: Severity, spec: ToastSpec) -> ToastId {
        if let Some(requested) = spec.severity.filter(|s| *s != severity) {
            tracing::debug!(%requested, preset = %severity, "Severity preset overrides spec");
        }
        self.add(spec.severity(severity))
    }

    /// Adds an info toast.
    pub fn info(&self, spec: ToastSpec) -> ToastId {
        self.add_with_severity(Severity::Info, spec)
    }

    /// Adds a success toast.
    pub fn success(&self, spec: ToastSpec) -> ToastId {
        self.add_with_severity(Severity::Success, spec)
    }

    /// Adds a warning toast.
    pub fn warning(&self, spec: ToastSpec) -> ToastId {
        self.add_with_severity(Severity::Warning, spec)
    }

    /// Adds an error toast.
    pub fn error(&self, spec: ToastSpec) -> ToastId {
        self.add_with_severity(Severity::Error, spec)
    }

    /// Merges `patch` into the toast with `id`.
    ///
    /// A patch carrying a ttl cancels the pending timer and starts a new one
    /// from now. Returns false if no such toast exists.
    pub fn update(&self, id: &ToastId, patch: ToastPatch) -> bool {
        let (replaced_hook, snapshot) = {
            let mut state = self.lock();
            if state.closed {
                tracing::warn!(id = %id, "Toast queue has been shut down, ignoring update");
                return false;
            }
            let Some(pos) = state.position(id) else {
                tracing::trace!(id = %id, "Update for unknown toast ignored");
                return false;
            };

            let entry = &mut state.entries[pos];
            let effects = patch.merge_into(&mut entry.toast, self.inner.default_ttl);
            if let Some(ttl) = effects.reschedule {
                entry.cancel_timer();
                entry.timer = self.schedule(id, ttl);
            }
            let replaced_hook = effects
                .on_dismiss
                .and_then(|hook| entry.on_dismiss.replace(hook));

            (replaced_hook, self.commit(&state))
        };
        drop(replaced_hook);

        tracing::debug!(id = %id, "Toast updated");
        self.inner
            .subscribers
            .publish(&ToastEvent::Updated(id.clone()), &snapshot);
        true
    }

    /// Removes the toast with `id`, running its dismissal callback.
    ///
    /// Returns false if no such toast exists, so repeated calls are harmless.
    pub fn remove(&self, id: &ToastId) -> bool {
        self.remove_where(id, RemovalReason::Dismissed, |_| true)
    }

    /// Alias for [`remove`](Self::remove), matching the renderer's close action.
    pub fn dismiss(&self, id: &ToastId) -> bool {
        self.remove(id)
    }

    /// Removes every toast, running each dismissal callback once.
    ///
    /// Returns the number of toasts removed.
    pub fn dismiss_all(&self) -> usize {
        let (entries, snapshot) = {
            let mut state = self.lock();
            if state.closed {
                return 0;
            }
            let mut entries: Vec<Entry> = state.entries.drain(..).collect();
            for entry in entries.iter_mut() {
                entry.cancel_timer();
            }
            (entries, self.commit(&state))
        };

        let count = entries.len();
        tracing::debug!(count, "All toasts dismissed");
        for entry in entries {
            let event = ToastEvent::Removed {
                id: entry.toast.id,
                reason: RemovalReason::Dismissed,
            };
            self.inner.subscribers.publish(&event, &snapshot);
            if let Some(hook) = entry.on_dismiss {
                hook.call();
            }
        }
        count
    }

    /// Cancels every pending timer and discards all toasts.
    ///
    /// Dismissal callbacks are not run. Later producer calls are ignored
    /// with a warning.
    pub fn shutdown(&self) {
        let discarded = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            let mut entries: Vec<Entry> = state.entries.drain(..).collect();
            for entry in entries.iter_mut() {
                entry.cancel_timer();
            }
            self.commit(&state);
            entries
        };
        tracing::debug!(discarded = discarded.len(), "Toast queue shut down");
    }

    /// Returns whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.lock().closed
    }

    /// Returns the current toasts in display order.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.watch_tx.borrow().clone()
    }

    /// Returns a copy of the toast with `id`.
    pub fn get(&self, id: &ToastId) -> Option<Toast> {
        let state = self.lock();
        state.position(id).map(|pos| state.entries[pos].toast.clone())
    }

    /// Returns the number of active toasts.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a handler called after every mutation.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&ToastEvent, &[Toast]) + Send + Sync + 'static,
    {
        self.inner.subscribers.subscribe(handler)
    }

    /// Removes a handler. Returns false if it was not registered.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) -> bool {
        self.inner.subscribers.unsubscribe(subscriber_id)
    }

    /// Returns a receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.inner.watch_tx.subscribe()
    }

    /// Returns true if both handles refer to the same queue.
    pub fn ptr_eq(&self, other: &ToastQueue) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes the current state to watchers. Called with the lock held so
    /// watchers see mutations in order.
    fn commit(&self, state: &QueueState) -> Snapshot {
        let snapshot = state.snapshot();
        self.inner.watch_tx.send_replace(snapshot.clone());
        snapshot
    }

    fn schedule(&self, id: &ToastId, ttl: Ttl) -> Option<ExpiryTimer> {
        let duration = ttl.duration()?;
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let queue = Arc::downgrade(&self.inner);
        let id = id.clone();

        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = queue.upgrade() {
                ToastQueue { inner }.expire(&id, generation);
            }
        });

        Some(ExpiryTimer { generation, handle })
    }

    /// Removes `id` if its pending timer is still `generation`.
    fn expire(&self, id: &ToastId, generation: u64) -> bool {
        self.remove_where(id, RemovalReason::Expired, |entry| {
            entry
                .timer
                .as_ref()
                .is_some_and(|timer| timer.generation == generation)
        })
    }

    fn remove_where(
        &self,
        id: &ToastId,
        reason: RemovalReason,
        matches: impl FnOnce(&Entry) -> bool,
    ) -> bool {
        let (entry, snapshot) = {
            let mut state = self.lock();
            if state.closed {
                tracing::warn!(id = %id, "Toast queue has been shut down, ignoring removal");
                return false;
            }
            let Some(pos) = state.position(id) else {
                tracing::trace!(id = %id, "Removal of unknown toast ignored");
                return false;
            };
            if !matches(&state.entries[pos]) {
                tracing::trace!(id = %id, "Stale expiry ignored");
                return false;
            }

            let mut entry = state.entries.remove(pos);
            entry.cancel_timer();
            (entry, self.commit(&state))
        };

        tracing::debug!(id = %id, ?reason, "Toast removed");
        let event = ToastEvent::Removed {
            id: id.clone(),
            reason,
        };
        self.inner.subscribers.publish(&event, &snapshot);
        if let Some(hook) = entry.on_dismiss {
            hook.call();
        }
        true
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("len", &self.len())
            .field("default_ttl", &self.inner.default_ttl)
            .field("subscribers", &self.inner.subscribers)
            .finish()
    }
}
