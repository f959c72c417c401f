//! In-app presentation channel.
//!
//! The UI layer implements [`PresentationSink`] to render toasts and
//! banners. Enqueueing is in-memory and cannot fail, which is what makes the
//! in-app channel the delivery floor for every dispatch.

use chorely_core::MessageDescriptor;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

/// Visual style of an in-app notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    /// A dispatched message.
    Message,
    /// Positive confirmation (back online, message sent).
    Success,
    /// Problem the user should see (offline).
    Warning,
}

/// How long a notice stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeDisplay {
    /// Hidden automatically after the duration.
    Timed(Duration),
    /// Stays until dismissed by key.
    Persistent,
}

/// One entry for the in-app sink.
#[derive(Debug, Clone, PartialEq)]
pub struct InAppNotice {
    pub id: Uuid,
    /// Stable key for notices that are later dismissed programmatically.
    pub key: Option<String>,
    pub title: String,
    pub body: String,
    pub style: NoticeStyle,
    pub display: NoticeDisplay,
    pub tag: Option<String>,
    pub icon: Option<String>,
    pub data: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

impl InAppNotice {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        style: NoticeStyle,
        display: NoticeDisplay,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: None,
            title: title.into(),
            body: body.into(),
            style,
            display,
            tag: None,
            icon: None,
            data: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// In-app rendition of a dispatched message.
    pub fn message(descriptor: &MessageDescriptor, duration: Duration) -> Self {
        Self {
            tag: descriptor.tag.clone(),
            icon: descriptor.icon.clone(),
            data: descriptor.data.clone(),
            ..Self::new(
                descriptor.title.trim(),
                descriptor.body.trim(),
                NoticeStyle::Message,
                NoticeDisplay::Timed(duration),
            )
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Whether the notice is still on screen at `now`.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        match self.display {
            NoticeDisplay::Persistent => true,
            NoticeDisplay::Timed(duration) => chrono::Duration::from_std(duration)
                .map(|d| self.created_at + d > now)
                .unwrap_or(true),
        }
    }
}

/// Sink consumed by the UI layer.
pub trait PresentationSink: Send + Sync {
    /// Show a notice. Must not fail.
    fn enqueue(&self, notice: InAppNotice);

    /// Remove every notice carrying `key`.
    fn dismiss(&self, key: &str);
}

/// Sink that keeps notices in memory, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    notices: Mutex<Vec<InAppNotice>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice enqueued and not dismissed, oldest first.
    pub fn notices(&self) -> Vec<InAppNotice> {
        self.lock().clone()
    }

    /// Notices still visible now.
    pub fn visible(&self) -> Vec<InAppNotice> {
        let now = Utc::now();
        self.lock()
            .iter()
            .filter(|n| n.is_visible_at(now))
            .cloned()
            .collect()
    }

    /// Notices with the given key.
    pub fn keyed(&self, key: &str) -> Vec<InAppNotice> {
        self.lock()
            .iter()
            .filter(|n| n.key.as_deref() == Some(key))
            .cloned()
            .collect()
    }

    /// Notices of the given style.
    pub fn styled(&self, style: NoticeStyle) -> Vec<InAppNotice> {
        self.lock()
            .iter()
            .filter(|n| n.style == style)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<InAppNotice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PresentationSink for MemorySink {
    fn enqueue(&self, notice: InAppNotice) {
        self.lock().push(notice);
    }

    fn dismiss(&self, key: &str) {
        self.lock().retain(|n| n.key.as_deref() != Some(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_copies_descriptor_fields() {
        let descriptor = MessageDescriptor::new("  Oi ", "Tudo bem?")
            .with_tag("hello")
            .with_data("k", "v");
        let notice = InAppNotice::message(&descriptor, Duration::from_secs(5));

        assert_eq!(notice.title, "Oi");
        assert_eq!(notice.tag.as_deref(), Some("hello"));
        assert_eq!(notice.style, NoticeStyle::Message);
        assert_eq!(notice.display, NoticeDisplay::Timed(Duration::from_secs(5)));
        assert_eq!(notice.data.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn dismiss_removes_only_matching_key() {
        let sink = MemorySink::new();
        sink.enqueue(
            InAppNotice::new("a", "", NoticeStyle::Warning, NoticeDisplay::Persistent)
                .with_key("offline"),
        );
        sink.enqueue(InAppNotice::new(
            "b",
            "",
            NoticeStyle::Message,
            NoticeDisplay::Persistent,
        ));

        sink.dismiss("offline");
        let left = sink.notices();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "b");
    }

    #[test]
    fn timed_notice_expires_persistent_does_not() {
        let timed = InAppNotice::new("t", "", NoticeStyle::Success, NoticeDisplay::Timed(Duration::from_secs(3)));
        let persistent = InAppNotice::new("p", "", NoticeStyle::Warning, NoticeDisplay::Persistent);
        let later = Utc::now() + chrono::Duration::hours(1);

        assert!(timed.is_visible_at(timed.created_at));
        assert!(!timed.is_visible_at(later));
        assert!(persistent.is_visible_at(later));
    }
}
