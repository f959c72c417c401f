//! Permission, connectivity and channel states.

use std::fmt;

/// Consent status for native alerts.
///
/// `Default` means the user has not answered yet. `Granted` and `Denied`
/// are terminal for the session; the platform may reset them between runs,
/// so hosts re-read the value on every startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionState {
    #[default]
    Default,
    Granted,
    Denied,
}

impl PermissionState {
    /// Whether a consent prompt could still change this state.
    pub fn is_undecided(self) -> bool {
        self == PermissionState::Default
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionState::Default => "default",
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network reachability of the host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectivityState {
    #[default]
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn is_online(self) -> bool {
        self == ConnectivityState::Online
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectivityState::Online => "online",
            ConnectivityState::Offline => "offline",
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A delivery channel a dispatch can use.
///
/// Ordered so that sets of channels iterate in-app first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// In-memory presentation inside the running app. Always available.
    InApp,
    /// The platform's notification center.
    Native,
}

impl Channel {
    /// Wire name of the channel.
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::InApp => "in-app",
            Channel::Native => "native",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn defaults() {
        assert_eq!(PermissionState::default(), PermissionState::Default);
        assert_eq!(ConnectivityState::default(), ConnectivityState::Online);
    }

    #[test]
    fn only_default_is_undecided() {
        assert!(PermissionState::Default.is_undecided());
        assert!(!PermissionState::Granted.is_undecided());
        assert!(!PermissionState::Denied.is_undecided());
    }

    #[test]
    fn channel_wire_names() {
        assert_eq!(Channel::InApp.to_string(), "in-app");
        assert_eq!(Channel::Native.to_string(), "native");
    }

    #[test]
    fn channel_set_orders_in_app_first() {
        let set: BTreeSet<_> = [Channel::Native, Channel::InApp].into_iter().collect();
        let names: Vec<_> = set.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["in-app", "native"]);
    }
}
