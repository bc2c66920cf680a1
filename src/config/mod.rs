//! Configuration and settings management.
//!
//! This module provides the settings types and their JSON persistence.

mod settings;

pub use settings::{ConfigError, ConfigResult, LoggingSettings, Settings, ToastSettings};
