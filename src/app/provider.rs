//! Process-wide toast queue slot.
//!
//! A [`ToastProvider`] installs its queue as the target of the free
//! functions in [`crate::app::toast`] for as long as it is alive. Dropping it
//! shuts the queue down and restores whichever queue was mounted before.

use std::sync::{PoisonError, RwLock};

use crate::config::ToastSettings;
use crate::services::{ToastQueue, ToastResult};

static ACTIVE: RwLock<Option<ToastQueue>> = RwLock::new(None);

/// Returns the mounted queue, if any.
pub(crate) fn active() -> Option<ToastQueue> {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Returns whether a provider is currently mounted.
pub fn is_mounted() -> bool {
    ACTIVE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Root scope owning the process-wide toast queue.
#[derive(Debug)]
pub struct ToastProvider {
    queue: ToastQueue,
    previous: Option<ToastQueue>,
}

impl ToastProvider {
    /// Creates a queue on the current Tokio runtime and mounts it.
    pub fn mount(settings: &ToastSettings) -> ToastResult<Self> {
        Ok(Self::mount_queue(ToastQueue::new(settings)?))
    }

    /// Mounts an existing queue.
    pub fn mount_queue(queue: ToastQueue) -> Self {
        let previous = ACTIVE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(queue.clone());
        if previous.is_some() {
            tracing::debug!("Toast provider shadows a previously mounted queue");
        }
        tracing::debug!("Toast provider mounted");

        Self { queue, previous }
    }

    /// The queue this provider owns.
    pub fn queue(&self) -> &ToastQueue {
        &self.queue
    }
}

impl Drop for ToastProvider {
    fn drop(&mut self) {
        {
            let mut slot = ACTIVE.write().unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|q| q.ptr_eq(&self.queue)) {
                *slot = self.previous.take().filter(|q| !q.is_shut_down());
            }
        }
        self.queue.shutdown();
        tracing::debug!("Toast provider unmounted");
    }
}

/// Serializes tests that touch the process-wide slot.
#[cfg(test)]
pub(crate) fn serial() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToastSpec;

    #[tokio::test]
    async fn mount_and_unmount() {
        let _guard = serial();
        assert!(!is_mounted());

        let provider = ToastProvider::mount(&ToastSettings::default()).unwrap();
        assert!(is_mounted());
        assert!(active().unwrap().ptr_eq(provider.queue()));

        let queue = provider.queue().clone();
        drop(provider);
        assert!(!is_mounted());
        assert!(queue.is_shut_down());
    }

    #[tokio::test]
    async fn nested_mount_restores_outer_queue() {
        let _guard = serial();
        let outer = ToastProvider::mount(&ToastSettings::default()).unwrap();
        {
            let inner = ToastProvider::mount(&ToastSettings::default()).unwrap();
            assert!(active().unwrap().ptr_eq(inner.queue()));
        }
        assert!(active().unwrap().ptr_eq(outer.queue()));

        outer.queue().add(ToastSpec::titled("still usable"));
        assert_eq!(outer.queue().len(), 1);
        drop(outer);
        assert!(!is_mounted());
    }

    #[tokio::test]
    async fn dropping_outer_first_leaves_inner_mounted() {
        let _guard = serial();
        let outer = ToastProvider::mount(&ToastSettings::default()).unwrap();
        let inner = ToastProvider::mount(&ToastSettings::default()).unwrap();

        drop(outer);
        assert!(active().unwrap().ptr_eq(inner.queue()));

        drop(inner);
        assert!(!is_mounted());
    }
}
