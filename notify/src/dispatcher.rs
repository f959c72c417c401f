//! Notification dispatch.
//!
//! `send` is the single entry point that turns a descriptor into deliveries:
//!
//! 1. Validate. A bad descriptor never touches a channel.
//! 2. Snapshot connectivity and permission together.
//! 3. Offline: fail, no channel used. There is no local queue.
//! 4. Online: in-app always, native when permission is granted, remote push
//!    fan-out when a transport is configured.
//!
//! Native and push failures are logged and swallowed. The in-app delivery
//! has already happened by then and is never rolled back.

use crate::config::Config;
use crate::error::NotifyError;
use crate::platform::{NativeNotification, NotificationPlatform, PushTransport};
use crate::sink::{InAppNotice, NoticeDisplay, NoticeStyle, PresentationSink};
use crate::state::SharedState;
use chorely_core::{
    resolve_audience, template, AudiencePolicy, Channel, MessageDescriptor, PermissionState, Role,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Record of one successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub id: Uuid,
    pub channels_used: BTreeSet<Channel>,
    pub timestamp: DateTime<Utc>,
    /// Confirmation for the sender, set for audiences that get one.
    pub acknowledgement: Option<String>,
}

impl DispatchResult {
    pub fn used(&self, channel: Channel) -> bool {
        self.channels_used.contains(&channel)
    }
}

pub struct NotificationDispatcher {
    state: Arc<SharedState>,
    platform: Arc<dyn NotificationPlatform>,
    sink: Arc<dyn PresentationSink>,
    push: Option<Arc<dyn PushTransport>>,
    message_notice: Duration,
    default_icon: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(
        state: Arc<SharedState>,
        platform: Arc<dyn NotificationPlatform>,
        sink: Arc<dyn PresentationSink>,
        push: Option<Arc<dyn PushTransport>>,
        config: &Config,
    ) -> Self {
        Self {
            state,
            platform,
            sink,
            push,
            message_notice: config.message_notice,
            default_icon: config.default_icon.clone(),
        }
    }

    /// Deliver `descriptor` to the `role` audience.
    pub fn send(
        &self,
        descriptor: &MessageDescriptor,
        role: Role,
    ) -> Result<DispatchResult, NotifyError> {
        descriptor.validate()?;

        let snapshot = self.state.snapshot();
        if !snapshot.connectivity.is_online() {
            warn!(audience = %role, "Dispatch rejected - device offline");
            return Err(NotifyError::Offline);
        }

        let policy = resolve_audience(role);
        let id = Uuid::new_v4();
        let mut channels_used = BTreeSet::new();

        // Delivery floor: always succeeds
        self.sink
            .enqueue(InAppNotice::message(descriptor, self.message_notice));
        channels_used.insert(Channel::InApp);

        let native = NativeNotification::from_descriptor(
            descriptor,
            &policy,
            self.default_icon.as_deref(),
        );

        if self.show_native(&native, &policy, snapshot.permission) {
            channels_used.insert(Channel::Native);
        }
        self.fan_out(native);

        let acknowledgement = policy.acknowledgement().map(|ack| {
            self.sink.enqueue(InAppNotice::new(
                ack,
                descriptor.title.trim(),
                NoticeStyle::Success,
                NoticeDisplay::Timed(self.message_notice),
            ));
            ack.to_string()
        });

        info!(
            dispatch_id = %id,
            audience = %role,
            channels = ?channels_used,
            tagged = descriptor.tag.is_some(),
            "Notification dispatched"
        );

        Ok(DispatchResult {
            id,
            channels_used,
            timestamp: Utc::now(),
            acknowledgement,
        })
    }

    /// Send a catalog template to the `role` audience.
    pub fn send_template(&self, id: &str, role: Role) -> Result<DispatchResult, NotifyError> {
        let template = template::find(id)?;
        self.send(&template.to_descriptor(), role)
    }

    /// Invoke the native channel if policy and permission allow it.
    ///
    /// Returns whether the platform accepted the call.
    fn show_native(
        &self,
        native: &NativeNotification,
        policy: &AudiencePolicy,
        permission: PermissionState,
    ) -> bool {
        if !policy.native_if_granted || permission != PermissionState::Granted {
            debug!(permission = %permission, "Skipping native channel");
            return false;
        }
        if !self.platform.is_supported() {
            debug!("Skipping native channel - platform unsupported");
            return false;
        }

        match self.platform.show(native) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Native notification failed - in-app delivery stands");
                false
            }
        }
    }

    /// Hand the notification to the remote push transport without waiting.
    fn fan_out(&self, native: NativeNotification) {
        let Some(push) = self.push.clone() else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime - skipping push fan-out");
            return;
        };

        runtime.spawn(async move {
            match push.deliver(&native).await {
                Ok(delivered) => debug!(delivered, "Push fan-out complete"),
                Err(e) => warn!(error = %e, "Push fan-out failed"),
            }
        });
    }
}
