//! Session-scoped wiring of the notify components.
//!
//! The host builds one [`NotifyService`] per signed-in session, handing in
//! its platform adapters. Every mutating entry point goes through the
//! offline gate.

use crate::config::Config;
use crate::connectivity::ConnectivityMonitor;
use crate::dispatcher::{DispatchResult, NotificationDispatcher};
use crate::error::NotifyError;
use crate::gate::OfflineGate;
use crate::models::{DispatchReport, NotificationPayload};
use crate::permission::PermissionManager;
use crate::platform::{NotificationPlatform, PushRegistrar, PushTransport};
use crate::sink::PresentationSink;
use crate::state::SharedState;
use chorely_core::{ConnectivityState, MessageDescriptor, PermissionState, Role};
use std::sync::Arc;
use tracing::info;

/// Platform adapters supplied by the host.
pub struct Collaborators {
    pub platform: Arc<dyn NotificationPlatform>,
    pub sink: Arc<dyn PresentationSink>,
    pub registrar: Option<Arc<dyn PushRegistrar>>,
    pub push: Option<Arc<dyn PushTransport>>,
    /// Current connectivity reading, `None` if the platform has no signal.
    pub connectivity: Option<ConnectivityState>,
}

/// Notification subsystem for one session
#[derive(Clone)]
pub struct NotifyService {
    pub role: Role,
    pub state: Arc<SharedState>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub permissions: Arc<PermissionManager>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub gate: OfflineGate,
}

impl NotifyService {
    pub fn new(config: &Config, role: Role, collaborators: Collaborators) -> Self {
        let Collaborators {
            platform,
            sink,
            registrar,
            push,
            connectivity,
        } = collaborators;

        let state = SharedState::new();
        let connectivity = Arc::new(ConnectivityMonitor::new(
            state.clone(),
            connectivity,
            sink.clone(),
            config,
        ));
        let permissions = PermissionManager::new(
            state.clone(),
            platform.clone(),
            registrar,
            connectivity.clone(),
        );
        let dispatcher = Arc::new(NotificationDispatcher::new(
            state.clone(),
            platform,
            sink,
            push,
            config,
        ));
        let gate = OfflineGate::new(connectivity.clone());

        permissions.resume();

        let snapshot = state.snapshot();
        info!(
            role = %role,
            connectivity = %snapshot.connectivity,
            permission = %snapshot.permission,
            "Notification service started"
        );

        Self {
            role,
            state,
            connectivity,
            permissions,
            dispatcher,
            gate,
        }
    }

    /// Send to this session's audience.
    pub fn send(&self, descriptor: &MessageDescriptor) -> Result<DispatchResult, NotifyError> {
        self.send_to(descriptor, self.role)
    }

    /// Send to an explicit audience.
    pub fn send_to(
        &self,
        descriptor: &MessageDescriptor,
        role: Role,
    ) -> Result<DispatchResult, NotifyError> {
        self.gate.run(|| self.dispatcher.send(descriptor, role))
    }

    /// Send a client payload and report the outcome in wire form.
    pub fn send_payload(&self, payload: NotificationPayload) -> Result<DispatchReport, NotifyError> {
        let descriptor = MessageDescriptor::from(payload);
        self.send(&descriptor).map(|r| DispatchReport::from(&r))
    }

    pub fn send_template(&self, id: &str) -> Result<DispatchResult, NotifyError> {
        self.gate
            .run(|| self.dispatcher.send_template(id, self.role))
    }

    pub async fn request_consent(&self) -> Result<PermissionState, NotifyError> {
        self.gate
            .run_async(|| self.permissions.request_consent())
            .await
    }

    /// Forward a platform connectivity event.
    pub fn signal_connectivity(&self, state: ConnectivityState) -> bool {
        self.connectivity.signal(state)
    }
}
