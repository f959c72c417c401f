//! Apple Push Notification Service (APNS) transport.
//!
//! Fans native notifications out to registered family devices.
//! Best-effort delivery - failures are logged but not retried.
//! The notification tag becomes the `apns-collapse-id`, so a newer alert
//! with the same tag replaces the older one on the device.

use crate::config::Config;
use crate::error::PushError;
use crate::platform::{DeviceToken, NativeNotification, PushTransport};
use a2::{
    Client, ClientConfig, CollapseId, DefaultNotificationBuilder, Endpoint, NotificationBuilder,
    NotificationOptions, Priority, PushType,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fs::File;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// APNS client wrapper holding the recipient devices
pub struct ApnsTransport {
    client: Option<Client>,
    bundle_id: String,
    recipients: DashMap<DeviceToken, DateTime<Utc>>,
}

impl ApnsTransport {
    /// Create a new APNS transport from configuration
    pub fn new(config: &Config) -> Self {
        let disabled = |bundle_id: String| Self {
            client: None,
            bundle_id,
            recipients: DashMap::new(),
        };

        let (Some(team_id), Some(key_id), Some(key_path), Some(bundle_id)) = (
            config.apns_team_id.as_ref(),
            config.apns_key_id.as_ref(),
            config.apns_key_path.as_ref(),
            config.apns_bundle_id.clone(),
        ) else {
            warn!("APNS not configured - remote push disabled");
            return disabled(String::new());
        };

        // Read the private key
        let mut key_file = match File::open(key_path) {
            Ok(f) => f,
            Err(e) => {
                error!(path = %key_path, error = %e, "Failed to open APNS key file");
                return disabled(bundle_id);
            }
        };

        let mut key_pem = Vec::new();
        if let Err(e) = key_file.read_to_end(&mut key_pem) {
            error!(error = %e, "Failed to read APNS key file");
            return disabled(bundle_id);
        }

        let endpoint = if config.apns_sandbox {
            Endpoint::Sandbox
        } else {
            Endpoint::Production
        };

        let client = match Client::token(&mut &key_pem[..], key_id, team_id, ClientConfig::new(endpoint)) {
            Ok(c) => Some(c),
            Err(e) => {
                error!(error = %e, "Failed to create APNS client");
                None
            }
        };

        if client.is_some() {
            debug!(sandbox = config.apns_sandbox, "APNS client initialized");
        }

        Self {
            client,
            bundle_id,
            recipients: DashMap::new(),
        }
    }

    /// Create a shared APNS transport
    pub fn shared(config: &Config) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Check if APNS is enabled
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Add a family device to the fan-out. Re-registering refreshes it.
    pub fn register_recipient(&self, token: DeviceToken) {
        debug!(token_prefix = %token.prefix(), "Registered push recipient");
        self.recipients.insert(token, Utc::now());
    }

    pub fn remove_recipient(&self, token: &DeviceToken) {
        self.recipients.remove(token);
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Send an alert to one device (best-effort)
    async fn send_alert(
        &self,
        client: &Client,
        device_token: &str,
        notification: &NativeNotification,
    ) -> bool {
        let collapse_id = match notification.tag.as_deref().map(CollapseId::new).transpose() {
            Ok(id) => id,
            Err(e) => {
                debug!(error = %e, "Tag unusable as collapse id - sending without one");
                None
            }
        };

        let options = NotificationOptions {
            apns_priority: Some(Priority::High),
            apns_topic: Some(&self.bundle_id),
            apns_push_type: Some(PushType::Alert),
            apns_collapse_id: collapse_id,
            ..Default::default()
        };

        let mut payload = DefaultNotificationBuilder::new()
            .set_title(&notification.title)
            .set_body(&notification.body)
            .build(device_token, options);

        if !notification.data.is_empty() {
            if let Err(e) = payload.add_custom_data("data", &notification.data) {
                debug!(error = %e, "Failed to add data to payload");
            }
        }
        if let Err(e) =
            payload.add_custom_data("require_interaction", &notification.require_interaction)
        {
            debug!(error = %e, "Failed to add require_interaction to payload");
        }

        match client.send(payload).await {
            Ok(response) => {
                debug!(status = ?response.code, "Sent push alert");
                response.code == 200
            }
            Err(e) => {
                // Log error but don't fail - best effort delivery
                debug!(error = %e, "Failed to send push notification");
                false
            }
        }
    }
}

#[async_trait]
impl PushTransport for ApnsTransport {
    /// Send to all registered devices in parallel (best-effort)
    async fn deliver(&self, notification: &NativeNotification) -> Result<usize, PushError> {
        let client = self.client.as_ref().ok_or(PushError::Disabled)?;

        let tokens: Vec<DeviceToken> = self.recipients.iter().map(|e| e.key().clone()).collect();
        if tokens.is_empty() {
            return Ok(0);
        }

        let send_futures: Vec<_> = tokens
            .iter()
            .map(|t| self.send_alert(client, t.as_str(), notification))
            .collect();

        let results = futures::future::join_all(send_futures).await;

        let success_count = results.iter().filter(|&&r| r).count();
        debug!(
            total = tokens.len(),
            success = success_count,
            "Sent push notifications"
        );

        if success_count == 0 {
            return Err(PushError::Delivery(format!(
                "all {} devices rejected the alert",
                tokens.len()
            )));
        }
        Ok(success_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorely_core::{resolve_audience, MessageDescriptor, Role};

    #[test]
    fn unconfigured_transport_is_disabled() {
        let transport = ApnsTransport::new(&Config::with_defaults());
        assert!(!transport.is_enabled());
    }

    #[test]
    fn missing_key_file_disables_transport() {
        let mut config = Config::with_defaults();
        config.apns_team_id = Some("TEAM".into());
        config.apns_key_id = Some("KEY".into());
        config.apns_key_path = Some("/nonexistent/AuthKey.p8".into());
        config.apns_bundle_id = Some("app.chorely".into());

        let transport = ApnsTransport::new(&config);
        assert!(!transport.is_enabled());
    }

    #[test]
    fn recipients_deduplicate_by_token() {
        let transport = ApnsTransport::new(&Config::with_defaults());
        transport.register_recipient(DeviceToken::new("aaaa"));
        transport.register_recipient(DeviceToken::new("aaaa"));
        transport.register_recipient(DeviceToken::new("bbbb"));
        assert_eq!(transport.recipient_count(), 2);

        transport.remove_recipient(&DeviceToken::new("aaaa"));
        assert_eq!(transport.recipient_count(), 1);
    }

    #[tokio::test]
    async fn disabled_transport_reports_disabled() {
        let transport = ApnsTransport::new(&Config::with_defaults());
        let native = NativeNotification::from_descriptor(
            &MessageDescriptor::new("t", "b"),
            &resolve_audience(Role::Child),
            None,
        );
        assert!(matches!(
            transport.deliver(&native).await,
            Err(PushError::Disabled)
        ));
    }
}
