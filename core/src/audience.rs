//! Audience roles and the delivery policy each one gets.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Text echoed back to a parent after a successful send.
pub const SENT_ACKNOWLEDGEMENT: &str = "Notificação enviada!";

/// Class of recipient for a session. Exactly one per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Child,
    Parent,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Child => "child",
            Role::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "child" => Ok(Role::Child),
            "parent" => Ok(Role::Parent),
            _ => Err(Error::UnknownRole { value: s.to_string() }),
        }
    }
}

/// Delivery policy resolved for an audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudiencePolicy {
    pub role: Role,
    /// Default for native notifications: stay until dismissed.
    pub require_interaction: bool,
    /// Use the native channel when permission is granted.
    pub native_if_granted: bool,
    /// Echo a "sent" acknowledgement to the sender.
    pub acknowledge_sender: bool,
}

impl AudiencePolicy {
    /// Text to return to the sender, if this audience gets one.
    pub fn acknowledgement(&self) -> Option<&'static str> {
        self.acknowledge_sender.then_some(SENT_ACKNOWLEDGEMENT)
    }
}

/// Resolve the delivery policy for a role.
///
/// Children get notifications that persist until dismissed. Parents get
/// transient ones plus a send confirmation. Both use in-app always and
/// native when granted.
pub fn resolve_audience(role: Role) -> AudiencePolicy {
    match role {
        Role::Child => AudiencePolicy {
            role,
            require_interaction: true,
            native_if_granted: true,
            acknowledge_sender: false,
        },
        Role::Parent => AudiencePolicy {
            role,
            require_interaction: false,
            native_if_granted: true,
            acknowledge_sender: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_policy() {
        let policy = resolve_audience(Role::Child);
        assert!(policy.require_interaction);
        assert!(policy.native_if_granted);
        assert_eq!(policy.acknowledgement(), None);
    }

    #[test]
    fn parent_policy() {
        let policy = resolve_audience(Role::Parent);
        assert!(!policy.require_interaction);
        assert!(policy.native_if_granted);
        assert_eq!(policy.acknowledgement(), Some(SENT_ACKNOWLEDGEMENT));
    }

    #[test]
    fn parse_role() {
        assert_eq!("child".parse::<Role>(), Ok(Role::Child));
        assert_eq!(" Parent ".parse::<Role>(), Ok(Role::Parent));
        assert_eq!(
            "grandma".parse::<Role>(),
            Err(Error::UnknownRole { value: "grandma".into() })
        );
    }

    #[test]
    fn role_display_roundtrips() {
        for role in [Role::Child, Role::Parent] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }
}
