//! Error types for the notify runtime.
//!
//! Only [`NotifyError`] ever reaches a caller. The other kinds are caught
//! where they happen, logged, and swallowed: the in-app channel already
//! satisfies the delivery floor, so nothing else is allowed to fail a send.

/// Errors surfaced to callers of `send`, `request_consent` and gated actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// No network at call time.
    #[error("device is offline")]
    Offline,

    /// The descriptor (or role / template id) was rejected.
    #[error("invalid notification: {0}")]
    Validation(#[from] chorely_core::Error),

    /// The platform has no native notification capability.
    #[error("native notifications are not supported on this platform")]
    PlatformUnsupported,
}

/// Push-token registration failures. Non-fatal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistrationError {
    #[error("push provider rejected registration: {0}")]
    Provider(String),

    #[error("push provider unreachable")]
    Unreachable,

    #[error("no push registrar configured")]
    NotConfigured,
}

/// Native display failures reported synchronously by the platform.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("native display rejected: {0}")]
    Rejected(String),

    #[error("notification permission not granted")]
    NotPermitted,
}

/// Remote push fan-out failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push transport disabled")]
    Disabled,

    #[error("push delivery failed: {0}")]
    Delivery(String),
}
