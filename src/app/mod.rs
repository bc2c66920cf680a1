//! Application-facing entry points.
//!
//! Mount a [`ToastProvider`] once near the root of the application, then
//! call the functions in [`toast`] from anywhere:
//!
//! ```no_run
//! use toast_queue::app::{toast, ToastProvider};
//! use toast_queue::config::ToastSettings;
//! use toast_queue::domain::{ToastPatch, ToastSpec, Ttl};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let _provider = ToastProvider::mount(&ToastSettings::default())?;
//!
//! let id = toast::info(ToastSpec::titled("Uploading").persistent());
//! toast::update(
//!     &id,
//!     ToastPatch::new().title("Uploaded").ttl(Ttl::from_millis(3000)),
//! );
//! # Ok(())
//! # }
//! ```

mod provider;
pub mod toast;

pub use provider::{is_mounted, ToastProvider};
