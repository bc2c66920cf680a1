//! toast-queue - A headless toast notification queue
//!
//! This crate provides an ordered queue of transient notifications with
//! per-toast auto-dismiss timers, in-place updates and manual dismissal,
//! plus a process-wide provider so producer code can raise toasts from
//! anywhere. Rendering is left to subscribers.

pub mod app;
pub mod config;
pub mod domain;
pub mod services;

pub use app::{toast, ToastProvider};
pub use domain::{Severity, Toast, ToastAction, ToastId, ToastPatch, ToastSpec, Ttl};
pub use services::{ToastEvent, ToastQueue};
