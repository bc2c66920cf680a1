//! Domain layer types for the toast queue.
//!
//! This module contains the records the queue stores and the request types
//! producers use to create and patch them.

mod toast;
mod types;

pub use toast::{DismissHook, Severity, Toast, ToastAction, ToastPatch, ToastSpec, Ttl};
pub use types::ToastId;
