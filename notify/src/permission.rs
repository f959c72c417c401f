//! Notification permission lifecycle.
//!
//! ```text
//!            request_consent()
//! Default ─────────────────────▶ Granted ──▶ push registration (best-effort)
//!    │
//!    └─────────────────────────▶ Denied
//! ```
//!
//! Granted and Denied are terminal for the session. At most one platform
//! prompt is in flight; concurrent callers share its resolution.

use crate::connectivity::ConnectivityMonitor;
use crate::error::{NotifyError, RegistrationError};
use crate::listeners::{Listeners, Subscription};
use crate::platform::{DeviceToken, NotificationPlatform, PushRegistrar};
use crate::state::SharedState;
use chorely_core::PermissionState;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

type PendingPrompt = Shared<BoxFuture<'static, PermissionState>>;

pub struct PermissionManager {
    state: Arc<SharedState>,
    platform: Arc<dyn NotificationPlatform>,
    registrar: Option<Arc<dyn PushRegistrar>>,
    connectivity: Arc<ConnectivityMonitor>,
    /// The prompt currently waiting on the user, if any
    pending: Mutex<Option<PendingPrompt>>,
    token: RwLock<Option<DeviceToken>>,
    listeners: Listeners<PermissionState>,
}

impl PermissionManager {
    /// Create the manager, seeding the permission state from what the
    /// platform reports right now.
    pub fn new(
        state: Arc<SharedState>,
        platform: Arc<dyn NotificationPlatform>,
        registrar: Option<Arc<dyn PushRegistrar>>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Arc<Self> {
        let reported = if platform.is_supported() {
            platform.permission()
        } else {
            PermissionState::Default
        };
        state.set_permission(reported);

        info!(
            permission = %reported,
            native_supported = platform.is_supported(),
            push_registrar = registrar.is_some(),
            "Permission manager started"
        );

        Arc::new(Self {
            state,
            platform,
            registrar,
            connectivity,
            pending: Mutex::new(None),
            token: RwLock::new(None),
            listeners: Listeners::new(),
        })
    }

    pub fn state(&self) -> PermissionState {
        self.state.permission()
    }

    /// Push token from the last successful registration.
    pub fn device_token(&self) -> Option<DeviceToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Ask the user for notification consent.
    ///
    /// A decided state is returned as-is without prompting. Otherwise the
    /// device must be online; the first caller starts the platform prompt
    /// and later callers wait on the same one.
    pub async fn request_consent(self: &Arc<Self>) -> Result<PermissionState, NotifyError> {
        let current = self.state();
        if !current.is_undecided() {
            debug!(permission = %current, "Consent already decided");
            return Ok(current);
        }

        if !self.platform.is_supported() {
            debug!("Consent requested on a platform without native notifications");
            return Err(NotifyError::PlatformUnsupported);
        }

        if !self.connectivity.state().is_online() {
            warn!("Consent request rejected - device offline");
            return Err(NotifyError::Offline);
        }

        Ok(self.pending_prompt().await)
    }

    fn pending_prompt(self: &Arc<Self>) -> PendingPrompt {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(prompt) = pending.as_ref() {
            debug!("Attaching to pending consent prompt");
            return prompt.clone();
        }

        let manager = Arc::clone(self);
        let prompt = async move { manager.run_prompt().await }.boxed().shared();
        *pending = Some(prompt.clone());
        prompt
    }

    async fn run_prompt(self: Arc<Self>) -> PermissionState {
        info!("Showing notification consent prompt");
        let answer = self.platform.request_consent().await;
        self.resolve(answer);
        answer
    }

    fn resolve(self: &Arc<Self>, answer: PermissionState) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if answer.is_undecided() {
            info!("Consent prompt dismissed without an answer");
            return;
        }

        self.state.set_permission(answer);
        info!(permission = %answer, "Consent resolved");
        self.listeners.emit(&answer);

        if answer == PermissionState::Granted {
            self.spawn_registration();
        }
    }

    /// Re-register the push token when the platform already reported
    /// Granted at startup.
    pub fn resume(self: &Arc<Self>) {
        if self.state() == PermissionState::Granted {
            self.spawn_registration();
        }
    }

    fn spawn_registration(self: &Arc<Self>) {
        if self.registrar.is_none() {
            debug!("No push registrar - skipping token registration");
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime - skipping token registration");
            return;
        };

        let manager = Arc::clone(self);
        runtime.spawn(async move {
            // Failure is already logged and never affects the permission state
            let _ = manager.register_device().await;
        });
    }

    /// Register this device with the push provider and keep the token.
    ///
    /// Failure is logged and returned, and leaves the permission state as
    /// it was.
    pub async fn register_device(&self) -> Result<DeviceToken, RegistrationError> {
        let registrar = self
            .registrar
            .as_ref()
            .ok_or(RegistrationError::NotConfigured)?;

        match registrar.register().await {
            Ok(token) => {
                info!(token_prefix = %token.prefix(), "Registered device for push notifications");
                *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Push registration failed - continuing without a token");
                Err(e)
            }
        }
    }

    /// Call `callback` whenever a consent prompt resolves to a decision.
    pub fn on_change(
        &self,
        callback: impl Fn(&PermissionState) + Send + Sync + 'static,
    ) -> Subscription {
        self.listeners.subscribe(callback)
    }
}
