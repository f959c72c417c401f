//! Configuration for the notify runtime.
//!
//! All configuration is loaded from environment variables. Hosts that keep
//! settings in a `.env` file call [`Config::load`]. No secrets are logged.

use std::time::Duration;

/// Default display time of the "back online" notice (seconds)
pub const ONLINE_NOTICE_SECS: u64 = 3;

/// Default display time of in-app messages and send acknowledgements (seconds)
pub const MESSAGE_NOTICE_SECS: u64 = 5;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // === In-app presentation ===
    /// How long the "back online" acknowledgement stays visible
    pub online_notice: Duration,

    /// How long dispatched messages and acknowledgements stay visible
    pub message_notice: Duration,

    /// Icon for native notifications whose descriptor has none
    pub default_icon: Option<String>,

    // === APNS Configuration ===
    /// APNS team ID
    pub apns_team_id: Option<String>,

    /// APNS key ID
    pub apns_key_id: Option<String>,

    /// Path to APNS private key (.p8 file)
    pub apns_key_path: Option<String>,

    /// APNS bundle ID (app identifier)
    pub apns_bundle_id: Option<String>,

    /// Use APNS sandbox (development) environment
    pub apns_sandbox: bool,
}

impl Config {
    /// Built-in defaults, ignoring the environment.
    pub fn with_defaults() -> Self {
        Self {
            online_notice: Duration::from_secs(ONLINE_NOTICE_SECS),
            message_notice: Duration::from_secs(MESSAGE_NOTICE_SECS),
            default_icon: None,
            apns_team_id: None,
            apns_key_id: None,
            apns_key_path: None,
            apns_bundle_id: None,
            apns_sandbox: true,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a `.env` file if present, then read the environment.
    pub fn load() -> Self {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::with_defaults();
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            online_notice: secs("ONLINE_NOTICE_SECS", defaults.online_notice),
            message_notice: secs("MESSAGE_NOTICE_SECS", defaults.message_notice),
            default_icon: lookup("NOTIFY_DEFAULT_ICON").filter(|s| !s.is_empty()),

            // APNS
            apns_team_id: lookup("APNS_TEAM_ID"),
            apns_key_id: lookup("APNS_KEY_ID"),
            apns_key_path: lookup("APNS_KEY_PATH"),
            apns_bundle_id: lookup("APNS_BUNDLE_ID"),
            apns_sandbox: lookup("APNS_SANDBOX")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.apns_sandbox), // Default to sandbox for safety
        }
    }

    /// Check if APNS is configured
    pub fn apns_configured(&self) -> bool {
        self.apns_team_id.is_some()
            && self.apns_key_id.is_some()
            && self.apns_key_path.is_some()
            && self.apns_bundle_id.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(from_map(&[]), Config::with_defaults());
    }

    #[test]
    fn durations_parsed_from_seconds() {
        let config = from_map(&[("ONLINE_NOTICE_SECS", "10"), ("MESSAGE_NOTICE_SECS", "1")]);
        assert_eq!(config.online_notice, Duration::from_secs(10));
        assert_eq!(config.message_notice, Duration::from_secs(1));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = from_map(&[("ONLINE_NOTICE_SECS", "soon"), ("APNS_SANDBOX", "nope")]);
        assert_eq!(config.online_notice, Duration::from_secs(ONLINE_NOTICE_SECS));
        assert!(!config.apns_sandbox);
    }

    #[test]
    fn apns_needs_all_four_settings() {
        let partial = from_map(&[("APNS_TEAM_ID", "T"), ("APNS_KEY_ID", "K")]);
        assert!(!partial.apns_configured());

        let full = from_map(&[
            ("APNS_TEAM_ID", "T"),
            ("APNS_KEY_ID", "K"),
            ("APNS_KEY_PATH", "/keys/a.p8"),
            ("APNS_BUNDLE_ID", "app.chorely"),
        ]);
        assert!(full.apns_configured());
    }

    #[test]
    fn empty_default_icon_is_unset() {
        assert_eq!(from_map(&[("NOTIFY_DEFAULT_ICON", "")]).default_icon, None);
        assert_eq!(
            from_map(&[("NOTIFY_DEFAULT_ICON", "/icon-192.png")]).default_icon.as_deref(),
            Some("/icon-192.png")
        );
    }
}
