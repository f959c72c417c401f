//! Wire models exchanged with the host UI.
//!
//! JSON shapes use camelCase to match what the web client sends. Domain
//! types live in `chorely-core`; these structs only translate.

use crate::dispatcher::DispatchResult;
use crate::error::NotifyError;
use chorely_core::{MessageDescriptor, Template};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Notification content as sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_interaction: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl NotificationPayload {
    /// Convert and validate in one step.
    pub fn into_descriptor(self) -> Result<MessageDescriptor, NotifyError> {
        let descriptor = MessageDescriptor::from(self);
        descriptor.validate()?;
        Ok(descriptor)
    }
}

impl From<NotificationPayload> for MessageDescriptor {
    fn from(p: NotificationPayload) -> Self {
        Self {
            title: p.title,
            body: p.body,
            tag: p.tag,
            require_interaction: p.require_interaction,
            icon: p.icon,
            badge: p.badge,
            data: p.data,
        }
    }
}

impl From<&MessageDescriptor> for NotificationPayload {
    fn from(d: &MessageDescriptor) -> Self {
        Self {
            title: d.title.clone(),
            body: d.body.clone(),
            icon: d.icon.clone(),
            badge: d.badge.clone(),
            tag: d.tag.clone(),
            require_interaction: d.require_interaction,
            data: d.data.clone(),
        }
    }
}

/// Dispatch outcome returned to the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub id: Uuid,
    /// Wire names: `"in-app"`, `"native"`
    pub channels_used: Vec<&'static str>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledgement: Option<String>,
}

impl From<&DispatchResult> for DispatchReport {
    fn from(r: &DispatchResult) -> Self {
        Self {
            id: r.id,
            channels_used: r.channels_used.iter().map(|c| c.as_str()).collect(),
            timestamp: r.timestamp,
            acknowledgement: r.acknowledgement.clone(),
        }
    }
}

/// Catalog entry for the template picker
#[derive(Debug, Clone, Serialize)]
pub struct TemplateView {
    pub id: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub icon: &'static str,
}

impl From<&Template> for TemplateView {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id,
            title: t.title,
            body: t.body,
            icon: t.icon,
        }
    }
}

/// The whole template catalog in display order
pub fn template_catalog() -> Vec<TemplateView> {
    chorely_core::template::all().iter().map(TemplateView::from).collect()
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<&NotifyError> for ErrorResponse {
    fn from(err: &NotifyError) -> Self {
        let code = match err {
            NotifyError::Offline => "OFFLINE",
            NotifyError::Validation(_) => "INVALID_NOTIFICATION",
            NotifyError::PlatformUnsupported => "PLATFORM_UNSUPPORTED",
        };
        Self {
            error: err.to_string(),
            code,
        }
    }
}
