//! Credential and probe configuration.
//!
//! The API key only ever comes from the environment; the user identifier and
//! probe tuning come from the command line. Everything here is validated
//! before the first network call.

use std::fmt;
use std::time::Duration;

use crate::core::SteamId;
use crate::error::{AuditError, Result};

/// Environment variable holding the Steam Web API key
pub const API_KEY_ENV: &str = "STEAM_API_KEY";

/// Default niceness: slightly slower than the storefront's informal limit
pub const DEFAULT_NICENESS: f64 = 1.1;

/// Storefront budget: this many requests...
pub const STORE_REQUESTS_PER_WINDOW: f64 = 200.0;

/// ...per this many seconds
pub const STORE_WINDOW_SECS: f64 = 5.0 * 60.0;

/// Who to audit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentifier {
    /// Custom profile name (`steamcommunity.com/id/<username>`)
    Username(String),
    /// 64-bit Steam ID (`steamcommunity.com/profiles/<id>`)
    SteamId(SteamId),
}

impl fmt::Display for UserIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserIdentifier::Username(name) => write!(f, "username '{}'", name),
            UserIdentifier::SteamId(id) => write!(f, "Steam ID {}", id),
        }
    }
}

/// Resolved credentials for one run
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub user: UserIdentifier,
}

// Keeps the key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

impl Credentials {
    /// Build credentials from already-read inputs.
    ///
    /// Fails when the key is absent or blank, or when not exactly one of
    /// `username` / `steam_id` is given.
    pub fn resolve(
        api_key: Option<String>,
        username: Option<String>,
        steam_id: Option<u64>,
    ) -> Result<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AuditError::Config(format!(
                    "{} is not set (get a key at https://steamcommunity.com/dev/apikey)",
                    API_KEY_ENV
                ))
            })?;

        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let user = match (username, steam_id) {
            (Some(name), None) => UserIdentifier::Username(name),
            (None, Some(id)) => UserIdentifier::SteamId(SteamId(id)),
            (Some(_), Some(_)) => {
                return Err(AuditError::Config(
                    "set either a username or a Steam ID, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AuditError::Config(
                    "you need to set either a username or a Steam ID".to_string(),
                ))
            }
        };

        Ok(Self { api_key, user })
    }

    /// Read the key from `STEAM_API_KEY` and combine it with the identifier.
    pub fn from_env(username: Option<String>, steam_id: Option<u64>) -> Result<Self> {
        Self::resolve(std::env::var(API_KEY_ENV).ok(), username, steam_id)
    }
}

/// Operating system a game is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Platform {
    Windows,
    Mac,
    #[default]
    Linux,
}

impl Platform {
    /// Key under `data.platforms` in a storefront payload
    pub fn store_key(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
        }
    }

    /// Label used in the printed report
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Mac => "Mac",
            Platform::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Probe tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSettings {
    pub platform: Platform,
    /// >1.0 is slower and safer, <1.0 is faster and riskier
    pub niceness: f64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            niceness: DEFAULT_NICENESS,
        }
    }
}

impl ProbeSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.niceness.is_finite() || self.niceness <= 0.0 {
            return Err(AuditError::Config(format!(
                "niceness must be a positive number, got {}",
                self.niceness
            )));
        }
        self.request_interval().map(|_| ())
    }

    /// Spacing between two storefront requests
    pub fn request_interval(&self) -> Result<Duration> {
        let secs = self.niceness * STORE_WINDOW_SECS / STORE_REQUESTS_PER_WINDOW;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            AuditError::Config(format!(
                "niceness {} gives an unusable request interval",
                self.niceness
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_username() {
        let creds = Credentials::resolve(Some("KEY".into()), Some("gaben".into()), None).unwrap();
        assert_eq!(creds.api_key, "KEY");
        assert_eq!(creds.user, UserIdentifier::Username("gaben".into()));
    }

    #[test]
    fn test_resolve_steam_id() {
        let creds = Credentials::resolve(Some("KEY".into()), None, Some(76561197960287930)).unwrap();
        assert_eq!(creds.user, UserIdentifier::SteamId(SteamId(76561197960287930)));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = Credentials::resolve(None, Some("gaben".into()), None).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));

        let err = Credentials::resolve(Some("   ".into()), Some("gaben".into()), None).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn test_identifier_must_be_exactly_one() {
        let none = Credentials::resolve(Some("KEY".into()), None, None).unwrap_err();
        assert!(matches!(none, AuditError::Config(_)));

        let both = Credentials::resolve(Some("KEY".into()), Some("gaben".into()), Some(1)).unwrap_err();
        assert!(matches!(both, AuditError::Config(_)));

        // Blank username counts as absent
        let blank = Credentials::resolve(Some("KEY".into()), Some("".into()), None).unwrap_err();
        assert!(matches!(blank, AuditError::Config(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials::resolve(Some("SECRET".into()), Some("gaben".into()), None).unwrap();
        assert!(!format!("{:?}", creds).contains("SECRET"));
    }

    #[test]
    fn test_request_interval() {
        let settings = ProbeSettings { platform: Platform::Linux, niceness: 1.0 };
        assert_eq!(settings.request_interval().unwrap(), Duration::from_millis(1500));

        let default = ProbeSettings::default();
        let interval = default.request_interval().unwrap();
        assert_eq!(interval, Duration::from_secs_f64(1.1 * 300.0 / 200.0));
        assert!(interval > Duration::from_millis(1500));
    }

    #[test]
    fn test_niceness_validation() {
        assert!(ProbeSettings::default().validate().is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e300] {
            let settings = ProbeSettings { platform: Platform::Linux, niceness: bad };
            assert!(settings.validate().is_err(), "niceness {} accepted", bad);
        }
    }

    #[test]
    fn test_huge_niceness_is_config_error() {
        let settings = ProbeSettings { platform: Platform::Linux, niceness: 1e300 };
        assert!(matches!(settings.validate(), Err(AuditError::Config(_))));
        assert!(matches!(settings.request_interval(), Err(AuditError::Config(_))));

        // Large but representable spacing is still accepted
        let slow = ProbeSettings { platform: Platform::Linux, niceness: 1e6 };
        assert!(slow.validate().is_ok());
    }

    #[test]
    fn test_platform_keys() {
        assert_eq!(Platform::default(), Platform::Linux);
        assert_eq!(Platform::Mac.store_key(), "mac");
        assert_eq!(Platform::Windows.to_string(), "Windows");
    }
}
