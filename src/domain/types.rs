//! Core identifier types for domain entities.
//!
//! These newtype wrappers keep toast identifiers from being mixed up with
//! arbitrary strings handed around by producer code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a toast.
///
/// Generated by the queue when a toast is added and stable for the toast's
/// whole lifetime. The empty identifier is returned by producer calls that
/// could not reach a mounted queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToastId(pub String);

impl ToastId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(format!("toast-{}", uuid::Uuid::new_v4().simple()))
    }

    /// The sentinel identifier returned when no queue is available.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns true for the sentinel identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ToastId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ToastId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
