//! Platform capability seams.
//!
//! The host supplies the consent prompt, the native display and push
//! registration through these traits. A platform without native support
//! reports `is_supported() == false` and every dispatch degrades to the
//! in-app channel.

use crate::error::{PlatformError, PushError, RegistrationError};
use async_trait::async_trait;
use chorely_core::{AudiencePolicy, MessageDescriptor, PermissionState};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;
use uuid::Uuid;

/// Opaque push-provider token for this device.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeviceToken(String);

impl DeviceToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First characters only, safe for logs.
    pub fn prefix(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

// Tokens never print in full, not even in debug output.
impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceToken({}…)", self.prefix())
    }
}

/// What the native channel displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeNotification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tag: Option<String>,
    pub require_interaction: bool,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub data: BTreeMap<String, String>,
}

impl NativeNotification {
    /// Build the native payload, filling unset fields from the audience
    /// policy and the configured default icon.
    pub fn from_descriptor(
        descriptor: &MessageDescriptor,
        policy: &AudiencePolicy,
        default_icon: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: descriptor.title.trim().to_string(),
            body: descriptor.body.trim().to_string(),
            tag: descriptor.tag.clone(),
            require_interaction: descriptor
                .require_interaction
                .unwrap_or(policy.require_interaction),
            icon: descriptor
                .icon
                .clone()
                .or_else(|| default_icon.map(str::to_string)),
            badge: descriptor.badge.clone(),
            data: descriptor.data.clone(),
        }
    }

    /// Key under which the notification sits in a tray. Same tag, same slot.
    pub fn slot(&self) -> String {
        self.tag.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Native notification capability of the host platform.
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    /// Whether native notifications exist at all on this platform.
    fn is_supported(&self) -> bool;

    /// Permission as the platform currently reports it.
    fn permission(&self) -> PermissionState;

    /// Show the consent prompt and wait for the user. May return `Default`
    /// if the prompt was dismissed without an answer.
    async fn request_consent(&self) -> PermissionState;

    /// Display a notification. Fire-and-forget: an `Ok` means the platform
    /// accepted the call, not that the user saw it.
    fn show(&self, notification: &NativeNotification) -> Result<(), PlatformError>;
}

/// Push-provider registration for this device.
#[async_trait]
pub trait PushRegistrar: Send + Sync {
    async fn register(&self) -> Result<DeviceToken, RegistrationError>;
}

/// Remote fan-out of native notifications to other devices.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Deliver to every recipient the transport knows. Returns how many
    /// devices accepted the notification.
    async fn deliver(&self, notification: &NativeNotification) -> Result<usize, PushError>;
}

/// Platform without any native notification capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPlatform;

#[async_trait]
impl NotificationPlatform for UnsupportedPlatform {
    fn is_supported(&self) -> bool {
        false
    }

    fn permission(&self) -> PermissionState {
        PermissionState::Default
    }

    async fn request_consent(&self) -> PermissionState {
        PermissionState::Default
    }

    fn show(&self, _notification: &NativeNotification) -> Result<(), PlatformError> {
        Err(PlatformError::Rejected("platform has no native notifications".into()))
    }
}

/// In-process platform with a tray keyed by tag.
///
/// Used by headless hosts and tests. The consent prompt answers with a
/// preset value; it can be held open until [`MemoryPlatform::release_prompt`].
#[derive(Debug)]
pub struct MemoryPlatform {
    permission: Mutex<PermissionState>,
    answer: Mutex<PermissionState>,
    hold_prompts: bool,
    release: Notify,
    prompts: AtomicUsize,
    reject_show: AtomicBool,
    shown: AtomicUsize,
    tray: DashMap<String, NativeNotification>,
}

impl MemoryPlatform {
    /// Platform reporting `permission` at startup. Prompts answer `Granted`
    /// unless changed with [`MemoryPlatform::answering`].
    pub fn new(permission: PermissionState) -> Self {
        Self {
            permission: Mutex::new(permission),
            answer: Mutex::new(PermissionState::Granted),
            hold_prompts: false,
            release: Notify::new(),
            prompts: AtomicUsize::new(0),
            reject_show: AtomicBool::new(false),
            shown: AtomicUsize::new(0),
            tray: DashMap::new(),
        }
    }

    pub fn answering(self, answer: PermissionState) -> Self {
        *self.answer.lock().unwrap_or_else(PoisonError::into_inner) = answer;
        self
    }

    /// Keep prompts pending until `release_prompt` is called.
    pub fn holding_prompts(mut self) -> Self {
        self.hold_prompts = true;
        self
    }

    /// Let a held prompt resolve.
    pub fn release_prompt(&self) {
        self.release.notify_one();
    }

    /// Make `show` fail, as a browser does when the display API throws.
    pub fn set_reject_show(&self, reject: bool) {
        self.reject_show.store(reject, Ordering::SeqCst);
    }

    /// Number of consent prompts the user has seen.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    /// Number of accepted `show` calls.
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    /// Notifications currently in the tray.
    pub fn tray(&self) -> Vec<NativeNotification> {
        self.tray.iter().map(|e| e.value().clone()).collect()
    }

    /// The notification occupying the slot for `tag`.
    pub fn tray_slot(&self, tag: &str) -> Option<NativeNotification> {
        self.tray.get(tag).map(|e| e.value().clone())
    }

    /// User dismisses a notification.
    pub fn dismiss(&self, slot: &str) {
        self.tray.remove(slot);
    }
}

#[async_trait]
impl NotificationPlatform for MemoryPlatform {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn request_consent(&self) -> PermissionState {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        if self.hold_prompts {
            self.release.notified().await;
        }

        let answer = *self.answer.lock().unwrap_or_else(PoisonError::into_inner);
        if !answer.is_undecided() {
            *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = answer;
        }
        answer
    }

    fn show(&self, notification: &NativeNotification) -> Result<(), PlatformError> {
        if self.reject_show.load(Ordering::SeqCst) {
            return Err(PlatformError::Rejected("display blocked".into()));
        }
        if self.permission() != PermissionState::Granted {
            return Err(PlatformError::NotPermitted);
        }

        self.tray.insert(notification.slot(), notification.clone());
        self.shown.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
