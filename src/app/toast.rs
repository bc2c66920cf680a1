//! Producer functions for the mounted toast queue.
//!
//! These can be called from anywhere. Before a [`ToastProvider`] is mounted
//! (or after it is dropped) they log a warning and do nothing, returning
//! [`ToastId::empty`] where an ID is expected.
//!
//! [`ToastProvider`]: super::ToastProvider

use super::provider;
use crate::domain::{Severity, ToastId, ToastPatch, ToastSpec};
use crate::services::ToastQueue;

fn with_queue<T>(op: &'static str, f: impl FnOnce(&ToastQueue) -> T) -> Option<T> {
    match provider::active() {
        Some(queue) => Some(f(&queue)),
        None => {
            tracing::warn!(op, "Toast provider not mounted yet");
            None
        }
    }
}

/// Shows a toast with whatever severity `spec` carries.
pub fn show(spec: ToastSpec) -> ToastId {
    with_queue("show", |q| q.add(spec)).unwrap_or_else(ToastId::empty)
}

fn show_with(severity: Severity, spec: ToastSpec) -> ToastId {
    with_queue(severity.as_str(), |q| q.add_with_severity(severity, spec))
        .unwrap_or_else(ToastId::empty)
}

/// Shows an info toast.
pub fn info(spec: ToastSpec) -> ToastId {
    show_with(Severity::Info, spec)
}

/// Shows a success toast.
pub fn success(spec: ToastSpec) -> ToastId {
    show_with(Severity::Success, spec)
}

/// Shows a warning toast.
pub fn warning(spec: ToastSpec) -> ToastId {
    show_with(Severity::Warning, spec)
}

/// Shows an error toast.
pub fn error(spec: ToastSpec) -> ToastId {
    show_with(Severity::Error, spec)
}

/// Patches a toast in place. Returns false if nothing was updated.
pub fn update(id: &ToastId, patch: ToastPatch) -> bool {
    with_queue("update", |q| q.update(id, patch)).unwrap_or(false)
}

/// Dismisses a toast. Returns false if nothing was removed.
pub fn dismiss(id: &ToastId) -> bool {
    with_queue("dismiss", |q| q.dismiss(id)).unwrap_or(false)
}

/// Dismisses every toast and returns how many were removed.
pub fn dismiss_all() -> usize {
    with_queue("dismiss_all", ToastQueue::dismiss_all).unwrap_or(0)
}
