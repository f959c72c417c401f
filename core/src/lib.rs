//! Chorely Core - domain model for family task notifications.
//!
//! This library holds the parts of notification delivery that are pure data
//! and rules:
//! - Permission, connectivity and channel states
//! - Message descriptors and their validation
//! - Audience roles and the delivery policy per role
//! - The static catalog of message templates
//!
//! # Constraints
//!
//! This library intentionally does NOT:
//! - Access the network
//! - Touch any platform notification API
//! - Spawn tasks or hold shared state
//! - Log
//!
//! Those concerns live in `chorely-notify`.
//!
//! # Example
//!
//! ```
//! use chorely_core::{resolve_audience, template, Role};
//!
//! let descriptor = template::find("reminder").unwrap().to_descriptor();
//! descriptor.validate().unwrap();
//!
//! let policy = resolve_audience(Role::Child);
//! assert!(policy.require_interaction);
//! ```

#![warn(clippy::all)]

pub mod audience;
pub mod descriptor;
pub mod error;
pub mod state;
pub mod template;

pub use audience::{resolve_audience, AudiencePolicy, Role, SENT_ACKNOWLEDGEMENT};
pub use descriptor::{MessageDescriptor, MAX_BODY_CHARS, MAX_TITLE_CHARS};
pub use error::{Error, Result};
pub use state::{Channel, ConnectivityState, PermissionState};
pub use template::Template;
