//! toast-demo - Replays the toast stories against a live queue
//!
//! Usage: `toast-demo [settings.json]`. Toasts are "rendered" as log lines
//! by a subscriber, so run with `RUST_LOG=debug` to see queue internals.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use toast_queue::config::Settings;
use toast_queue::{toast, Toast, ToastAction, ToastEvent, ToastPatch, ToastProvider, ToastSpec, Ttl};

#[tokio::main]
async fn main() -> Result<()> {
    let settings_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => Settings::default_path()?,
    };
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading {}", settings_path.display()))?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.filter)),
        )
        .init();

    tracing::info!(settings = %settings_path.display(), "Starting toast demo");

    // Producers calling in before the provider exists are ignored.
    let early = toast::info(ToastSpec::titled("Too early"));
    tracing::info!(empty = early.is_empty(), "Toast raised before mount");

    let provider = ToastProvider::mount(&settings.toasts)?;
    provider.queue().subscribe(render);

    default_toast().await;
    status_variants();
    with_action();
    custom_duration().await;
    multiple_toasts().await;
    upload_progress().await;

    let mut rx = provider.queue().watch();
    rx.wait_for(|toasts| toasts.is_empty())
        .await
        .context("toast queue closed while draining")?;

    drop(provider);
    tracing::info!("Toast demo finished");
    Ok(())
}

/// Stand-in renderer: logs every change and the resulting stack.
fn render(event: &ToastEvent, toasts: &[Toast]) {
    tracing::info!(?event, visible = toasts.len(), "Toast stack changed");
    for toast in toasts {
        tracing::info!(
            severity = toast.severity.map(|s| s.as_str()).unwrap_or("-"),
            title = toast.title.as_deref().unwrap_or(""),
            body = toast.body.as_deref().unwrap_or(""),
            action = toast.action.as_ref().map(|a| a.label.as_str()).unwrap_or(""),
            "  toast"
        );
    }
}

async fn default_toast() {
    toast::show(
        ToastSpec::titled("Toast Notification")
            .body("This is a default toast notification")
            .ttl(Ttl::from_millis(5000)),
    );
    tokio::time::sleep(Duration::from_millis(500)).await;
}

fn status_variants() {
    toast::info(ToastSpec::titled("Information").body("This is an informational message"));
    toast::success(ToastSpec::titled("Success").body("Operation completed successfully"));
    toast::warning(ToastSpec::titled("Warning").body("This action might cause issues"));
    toast::error(ToastSpec::titled("Error").body("An error occurred during the operation"));
}

fn with_action() {
    toast::show(
        ToastSpec::titled("Update Available")
            .body("A new version is available. Would you like to update now?")
            .ttl(Ttl::from_millis(10_000))
            .action(ToastAction::new("update", "Update")),
    );
}

async fn custom_duration() {
    toast::show(
        ToastSpec::titled("Quick Toast")
            .body("This toast will disappear in 2 seconds")
            .ttl(Ttl::from_millis(2000)),
    );
    let persistent = toast::show(
        ToastSpec::titled("Persistent Toast")
            .body("This toast will stay until dismissed")
            .persistent()
            .on_dismiss(|| tracing::info!("Persistent toast closed")),
    );

    tokio::time::sleep(Duration::from_millis(3000)).await;
    toast::dismiss(&persistent);
}

async fn multiple_toasts() {
    toast::info(ToastSpec::titled("Process Started").body("Your request is being processed"));
    for step in ["Step 1 Complete", "Step 2 Complete", "Process Complete"] {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        toast::success(ToastSpec::titled(step).body("Completed successfully"));
    }
}

async fn upload_progress() {
    let id = toast::info(
        ToastSpec::titled("Uploading File")
            .body("Starting upload process...")
            .persistent(),
    );

    for percent in [25, 50, 75] {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        toast::update(
            &id,
            ToastPatch::new().body(format!("Uploading: {percent}% complete")),
        );
    }

    tokio::time::sleep(Duration::from_millis(1000)).await;
    toast::update(
        &id,
        ToastPatch::new()
            .title("Upload Complete")
            .body("Your file has been uploaded successfully")
            .severity(toast_queue::Severity::Success)
            .ttl(Ttl::from_millis(3000)),
    );
}
