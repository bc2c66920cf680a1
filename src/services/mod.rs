//! Services layer.
//!
//! This module contains the toast queue and the change-notification
//! machinery renderers subscribe to.
//!
//! # Architecture
//!
//! ```text
//! Producers (app::toast functions, application code)
//!          |
//!          v
//!    ToastQueue  <-- You are here
//!          |
//!          v
//! Subscribers (renderers via subscribe / watch)
//! ```

mod events;
mod toast_service;

pub use events::{EventHandler, RemovalReason, Snapshot, SubscriberId, ToastEvent};
pub use toast_service::{ToastError, ToastQueue, ToastResult};
