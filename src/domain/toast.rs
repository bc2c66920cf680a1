//! Toast records and the request types used to create and patch them.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::ToastId;

/// Informational classification of a toast. Has no effect on queue behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// An operation completed.
    Success,
    /// Something needs attention but nothing failed.
    Warning,
    /// An operation failed.
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a toast stays in the queue before it is removed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ttl {
    /// Remove after the given duration.
    After(Duration),
    /// Never remove automatically.
    Never,
}

impl Ttl {
    /// Creates a finite ttl from milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Ttl::After(Duration::from_millis(ms))
    }

    /// Resolves an optional requested ttl against the configured default.
    ///
    /// A missing or zero duration falls back to `default`.
    pub fn resolve(requested: Option<Ttl>, default: Duration) -> Ttl {
        match requested {
            Some(Ttl::After(d)) if !d.is_zero() => Ttl::After(d),
            Some(Ttl::Never) => Ttl::Never,
            _ => Ttl::After(default),
        }
    }

    /// Returns the duration for finite ttls.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Ttl::After(d) => Some(*d),
            Ttl::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Ttl::Never)
    }
}

/// An action affordance attached to a toast. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastAction {
    /// Action ID reported back by the renderer.
    pub id: String,
    /// Button label.
    pub label: String,
}

impl ToastAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Callback run exactly once when a toast leaves the queue.
pub struct DismissHook(Box<dyn FnOnce() + Send + 'static>);

impl DismissHook {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Consumes the hook and runs it.
    pub fn call(self) {
        (self.0)()
    }
}

impl fmt::Debug for DismissHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DismissHook(..)")
    }
}

/// A toast as seen by subscribers.
///
/// The dismissal callback is owned by the queue and never appears here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    /// Unique ID.
    pub id: ToastId,
    /// Title text.
    pub title: Option<String>,
    /// Body text.
    pub body: Option<String>,
    /// Severity, if one was given.
    pub severity: Option<Severity>,
    /// Resolved time-to-live.
    pub ttl: Ttl,
    /// Optional action.
    pub action: Option<ToastAction>,
    /// When the toast was added.
    pub created_at: DateTime<Utc>,
}

/// Request for a new toast. Everything except the ID.
#[derive(Debug, Default)]
pub struct ToastSpec {
    pub title: Option<String>,
    pub body: Option<String>,
    pub severity: Option<Severity>,
    /// `None` uses the queue's default ttl.
    pub ttl: Option<Ttl>,
    pub on_dismiss: Option<DismissHook>,
    pub action: Option<ToastAction>,
}

impl ToastSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a spec with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new().title(title)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Disables auto-dismiss.
    pub fn persistent(self) -> Self {
        self.ttl(Ttl::Never)
    }

    pub fn on_dismiss(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_dismiss = Some(DismissHook::new(f));
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Splits the spec into the stored record and its dismissal hook.
    pub(crate) fn into_toast(
        self,
        id: ToastId,
        default_ttl: Duration,
    ) -> (Toast, Option<DismissHook>) {
        let toast = Toast {
            id,
            title: self.title,
            body: self.body,
            severity: self.severity,
            ttl: Ttl::resolve(self.ttl, default_ttl),
            action: self.action,
            created_at: Utc::now(),
        };
        (toast, self.on_dismiss)
    }
}

/// Partial update of a stored toast. Unset fields are left untouched.
#[derive(Debug, Default)]
pub struct ToastPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub severity: Option<Severity>,
    /// Setting a ttl restarts the expiry timer from the moment of the update.
    pub ttl: Option<Ttl>,
    pub on_dismiss: Option<DismissHook>,
    pub action: Option<ToastAction>,
}

/// What a merged patch asks the queue to do beyond rewriting fields.
#[derive(Debug, Default)]
pub(crate) struct PatchEffects {
    /// The resolved ttl to reschedule with, if the patch carried one.
    pub reschedule: Option<Ttl>,
    /// Replacement dismissal hook.
    pub on_dismiss: Option<DismissHook>,
}

impl ToastPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn on_dismiss(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_dismiss = Some(DismissHook::new(f));
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Returns true if the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.severity.is_none()
            && self.ttl.is_none()
            && self.on_dismiss.is_none()
            && self.action.is_none()
    }

    /// Writes the set fields into `toast`.
    pub(crate) fn merge_into(self, toast: &mut Toast, default_ttl: Duration) -> PatchEffects {
        if let Some(title) = self.title {
            toast.title = Some(title);
        }
        if let Some(body) = self.body {
            toast.body = Some(body);
        }
        if let Some(severity) = self.severity {
            toast.severity = Some(severity);
        }
        if let Some(action) = self.action {
            toast.action = Some(action);
        }

        let reschedule = self.ttl.map(|ttl| {
            let resolved = Ttl::resolve(Some(ttl), default_ttl);
            toast.ttl = resolved;
            resolved
        });

        PatchEffects {
            reschedule,
            on_dismiss: self.on_dismiss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const DEFAULT: Duration = Duration::from_millis(5000);

    #[test]
    fn ttl_resolution() {
        assert_eq!(Ttl::resolve(None, DEFAULT), Ttl::After(DEFAULT));
        assert_eq!(
            Ttl::resolve(Some(Ttl::from_millis(2000)), DEFAULT),
            Ttl::from_millis(2000)
        );
        assert_eq!(Ttl::resolve(Some(Ttl::Never), DEFAULT), Ttl::Never);
    }

    #[test]
    fn zero_ttl_falls_back_to_default() {
        assert_eq!(
            Ttl::resolve(Some(Ttl::from_millis(0)), DEFAULT),
            Ttl::After(DEFAULT)
        );
    }

    #[test]
    fn spec_builder() {
        let spec = ToastSpec::titled("Saved")
            .body("All changes written")
            .severity(Severity::Success)
            .persistent()
            .action(ToastAction::new("undo", "Undo"));

        let (toast, hook) = spec.into_toast(ToastId::from("toast-1"), DEFAULT);
        assert_eq!(toast.id, ToastId::from("toast-1"));
        assert_eq!(toast.title.as_deref(), Some("Saved"));
        assert_eq!(toast.body.as_deref(), Some("All changes written"));
        assert_eq!(toast.severity, Some(Severity::Success));
        assert_eq!(toast.ttl, Ttl::Never);
        assert_eq!(toast.action, Some(ToastAction::new("undo", "Undo")));
        assert!(hook.is_none());
    }

    #[test]
    fn dismiss_hook_runs_once_on_call() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let (_, hook) = ToastSpec::titled("A")
            .on_dismiss(move || flag.store(true, Ordering::SeqCst))
            .into_toast(ToastId::generate(), DEFAULT);

        hook.expect("hook should be split off").call();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn patch_leaves_unset_fields_untouched() {
        let (mut toast, _) = ToastSpec::titled("A")
            .body("body")
            .severity(Severity::Info)
            .into_toast(ToastId::from("toast-1"), DEFAULT);
        let before = toast.clone();

        let effects = ToastPatch::new()
            .title("A2")
            .merge_into(&mut toast, DEFAULT);

        assert_eq!(toast.title.as_deref(), Some("A2"));
        assert_eq!(toast.body, before.body);
        assert_eq!(toast.severity, before.severity);
        assert_eq!(toast.ttl, before.ttl);
        assert_eq!(toast.created_at, before.created_at);
        assert!(effects.reschedule.is_none());
        assert!(effects.on_dismiss.is_none());
    }

    #[test]
    fn patch_with_ttl_requests_reschedule() {
        let (mut toast, _) =
            ToastSpec::titled("A").into_toast(ToastId::generate(), DEFAULT);

        let effects = ToastPatch::new()
            .ttl(Ttl::from_millis(750))
            .merge_into(&mut toast, DEFAULT);

        assert_eq!(toast.ttl, Ttl::from_millis(750));
        assert_eq!(effects.reschedule, Some(Ttl::from_millis(750)));
    }

    #[test]
    fn patch_may_change_severity() {
        let (mut toast, _) = ToastSpec::titled("A")
            .severity(Severity::Info)
            .into_toast(ToastId::generate(), DEFAULT);

        ToastPatch::new()
            .severity(Severity::Error)
            .merge_into(&mut toast, DEFAULT);

        assert_eq!(toast.severity, Some(Severity::Error));
    }

    #[test]
    fn empty_patch() {
        assert!(ToastPatch::new().is_empty());
        assert!(!ToastPatch::new().title("x").is_empty());
    }

    #[test]
    fn severity_serialization() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");

        let deserialized: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(deserialized, Severity::Error);
    }

    #[test]
    fn toast_serializes_without_hook() {
        let (toast, _) = ToastSpec::titled("A")
            .on_dismiss(|| {})
            .into_toast(ToastId::from("toast-1"), DEFAULT);

        let json = serde_json::to_string(&toast).unwrap();
        let deserialized: Toast = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, toast);
    }
}
