//! Notification content and its validation rules.
//!
//! A [`MessageDescriptor`] is what a caller hands to the dispatcher. It is
//! plain data; [`MessageDescriptor::validate`] is the single gate that
//! decides whether it may reach any channel.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Maximum title length in characters (after trimming).
pub const MAX_TITLE_CHARS: usize = 50;

/// Maximum body length in characters (after trimming).
pub const MAX_BODY_CHARS: usize = 200;

/// Structured payload describing one notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageDescriptor {
    pub title: String,
    pub body: String,
    /// Grouping key. A native notification with the tag of an undismissed
    /// one replaces it.
    pub tag: Option<String>,
    /// `None` defers to the audience default.
    pub require_interaction: Option<bool>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub data: BTreeMap<String, String>,
}

impl MessageDescriptor {
    /// Create a descriptor with only title and body set.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_require_interaction(mut self, require: bool) -> Self {
        self.require_interaction = Some(require);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Check title and body against the content rules.
    ///
    /// Both must be non-empty after trimming and fit their length caps.
    /// Lengths count characters, not bytes, so an emoji counts once.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule, title before body.
    pub fn validate(&self) -> Result<()> {
        check_text(&self.title, MAX_TITLE_CHARS, Error::EmptyTitle, |len, max| {
            Error::TitleTooLong { len, max }
        })?;
        check_text(&self.body, MAX_BODY_CHARS, Error::EmptyBody, |len, max| {
            Error::BodyTooLong { len, max }
        })
    }
}

fn check_text(
    text: &str,
    max: usize,
    empty: Error,
    too_long: impl FnOnce(usize, usize) -> Error,
) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(too_long(len, max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder() -> MessageDescriptor {
        MessageDescriptor::new("⏰ Lembrete", "Complete suas tarefas")
            .with_tag("reminder")
            .with_require_interaction(true)
    }

    #[test]
    fn valid_descriptor_passes() {
        assert_eq!(reminder().validate(), Ok(()));
    }

    #[test]
    fn empty_title_rejected() {
        let d = MessageDescriptor { title: String::new(), ..reminder() };
        assert_eq!(d.validate(), Err(Error::EmptyTitle));
    }

    #[test]
    fn whitespace_only_fields_rejected() {
        let d = MessageDescriptor::new("   ", "ok");
        assert_eq!(d.validate(), Err(Error::EmptyTitle));

        let d = MessageDescriptor::new("ok", "\n\t ");
        assert_eq!(d.validate(), Err(Error::EmptyBody));
    }

    #[test]
    fn title_length_counts_characters() {
        // 50 emoji are 200 bytes but only 50 characters.
        let d = MessageDescriptor::new("⏰".repeat(MAX_TITLE_CHARS), "ok");
        assert_eq!(d.validate(), Ok(()));

        let d = MessageDescriptor::new("a".repeat(MAX_TITLE_CHARS + 1), "ok");
        assert_eq!(
            d.validate(),
            Err(Error::TitleTooLong { len: 51, max: 50 })
        );
    }

    #[test]
    fn surrounding_whitespace_not_counted() {
        let title = format!("  {}  ", "a".repeat(MAX_TITLE_CHARS));
        assert_eq!(MessageDescriptor::new(title, "ok").validate(), Ok(()));
    }

    #[test]
    fn body_length_capped() {
        let d = MessageDescriptor::new("ok", "b".repeat(MAX_BODY_CHARS + 5));
        assert_eq!(
            d.validate(),
            Err(Error::BodyTooLong { len: 205, max: 200 })
        );
    }

    #[test]
    fn title_checked_before_body() {
        let d = MessageDescriptor::new("", "");
        assert_eq!(d.validate(), Err(Error::EmptyTitle));
    }

    #[test]
    fn builder_sets_optional_fields() {
        let d = reminder().with_icon("/icon.png").with_data("taskId", "42");
        assert_eq!(d.tag.as_deref(), Some("reminder"));
        assert_eq!(d.require_interaction, Some(true));
        assert_eq!(d.icon.as_deref(), Some("/icon.png"));
        assert_eq!(d.data.get("taskId").map(String::as_str), Some("42"));
    }
}
