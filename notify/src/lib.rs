//! # Chorely Notify
//!
//! Notification delivery and connectivity gating for the Chorely family
//! task tracker.
//!
//! ## Design Principles
//!
//! - **In-app floor**: every online dispatch reaches the in-app channel
//! - **Native when permitted**: the platform's notification center is used
//!   only after the user granted consent
//! - **No local queue**: offline dispatches fail fast, nothing is retried
//! - **Best-effort extras**: push registration, native display and remote
//!   fan-out fail silently for users and loudly in logs
//!
//! ## Architecture
//!
//! ```text
//!   caller ──▶ OfflineGate ──▶ NotificationDispatcher ──┬──▶ PresentationSink (in-app)
//!                 │                  │                  ├──▶ NotificationPlatform (native)
//!                 ▼                  ▼                  └──▶ PushTransport (APNS, spawned)
//!       ConnectivityMonitor   SharedState snapshot
//!                                    ▲
//!                           PermissionManager ──▶ PushRegistrar
//! ```

pub mod apns;
pub mod config;
pub mod connectivity;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod listeners;
pub mod models;
pub mod permission;
pub mod platform;
pub mod service;
pub mod sink;
pub mod state;

pub use config::Config;
pub use connectivity::ConnectivityMonitor;
pub use dispatcher::{DispatchResult, NotificationDispatcher};
pub use error::{NotifyError, PlatformError, PushError, RegistrationError};
pub use gate::OfflineGate;
pub use listeners::Subscription;
pub use permission::PermissionManager;
pub use platform::{
    DeviceToken, MemoryPlatform, NativeNotification, NotificationPlatform, PushRegistrar,
    PushTransport, UnsupportedPlatform,
};
pub use service::{Collaborators, NotifyService};
pub use sink::{InAppNotice, MemorySink, NoticeDisplay, NoticeStyle, PresentationSink};
pub use state::{SharedState, Snapshot};

/// Initialize tracing with environment-based log levels.
///
/// Returns `false` if the host already installed a global subscriber.
pub fn init_tracing() -> bool {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chorely_notify=debug")),
        )
        .try_init()
        .is_ok()
}
