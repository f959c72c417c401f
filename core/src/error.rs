//! Error types for chorely-core.
//!
//! Every error here is a validation failure: something the caller handed in
//! cannot become a notification. No external dependencies - implements
//! `std::error::Error` manually.
//!
//! # Error Categories
//!
//! - **Descriptor errors**: `EmptyTitle`, `TitleTooLong`, `EmptyBody`, `BodyTooLong`
//! - **Lookup errors**: `UnknownRole`, `UnknownTemplate`

use std::error::Error as StdError;
use std::fmt;

/// Result type alias for chorely-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or validating a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ==================== Descriptor Errors ====================
    /// Title is empty or whitespace only.
    EmptyTitle,

    /// Title exceeds the maximum length.
    TitleTooLong {
        /// Length of the trimmed title in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Body is empty or whitespace only.
    EmptyBody,

    /// Body exceeds the maximum length.
    BodyTooLong {
        /// Length of the trimmed body in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    // ==================== Lookup Errors ====================
    /// Audience role string is neither `child` nor `parent`.
    UnknownRole {
        /// The rejected value.
        value: String,
    },

    /// No template with this id exists in the catalog.
    UnknownTemplate {
        /// The requested template id.
        id: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyTitle => write!(f, "title cannot be empty"),
            Error::TitleTooLong { len, max } => {
                write!(
                    f,
                    "title too long: {} characters exceeds maximum {}",
                    len, max
                )
            }
            Error::EmptyBody => write!(f, "body cannot be empty"),
            Error::BodyTooLong { len, max } => {
                write!(
                    f,
                    "body too long: {} characters exceeds maximum {}",
                    len, max
                )
            }
            Error::UnknownRole { value } => {
                write!(f, "unknown audience role: {:?}", value)
            }
            Error::UnknownTemplate { id } => write!(f, "unknown template: {}", id),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = Error::TitleTooLong { len: 51, max: 50 };
        assert_eq!(
            err.to_string(),
            "title too long: 51 characters exceeds maximum 50"
        );

        let err = Error::UnknownRole {
            value: "grandma".into(),
        };
        assert_eq!(err.to_string(), "unknown audience role: \"grandma\"");

        assert_eq!(Error::EmptyBody.to_string(), "body cannot be empty");
    }

    #[test]
    fn error_implements_std_error() {
        let err = Error::EmptyTitle;
        let _: &dyn StdError = &err;
    }
}
