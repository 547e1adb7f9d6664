//! Credential configuration for the Google Ads provider
//!
//! The provider needs a pre-authenticated client context: a developer token
//! and an OAuth access token, optionally a manager (login) customer id.
//! Configuration is a small JSON file resolved in this order:
//!
//! 1. An explicit path (the CLI's `--config` flag)
//! 2. The `GOOGLE_ADS_CONFIG_PATH` environment variable
//! 3. `$HOME/.google-ads.json`
//!
//! ```json
//! {
//!   "developer_token": "...",
//!   "access_token": "...",
//!   "login_customer_id": "1234567890"
//! }
//! ```
//!
//! Token refresh is out of scope here; the file is expected to hold a valid
//! access token for the duration of a run.

use std::path::{Path, PathBuf};

use adsync_core::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "GOOGLE_ADS_CONFIG_PATH";

/// Default config file name, under `$HOME`
const DEFAULT_CONFIG_FILE: &str = ".google-ads.json";

/// Credentials for the Google Ads REST API
///
/// # Security
///
/// Tokens never appear in logs; the `Debug` implementation redacts them.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct GoogleAdsConfig {
    /// Google Ads developer token
    pub developer_token: String,

    /// OAuth2 access token with Google Ads scope
    pub access_token: String,

    /// Manager account id for `login-customer-id`, if operating under an MCC
    #[serde(default)]
    pub login_customer_id: Option<String>,
}

// Custom Debug implementation that hides the credential material
impl std::fmt::Debug for GoogleAdsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAdsConfig")
            .field("developer_token", &"<REDACTED>")
            .field("access_token", &"<REDACTED>")
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}

impl GoogleAdsConfig {
    /// Load the configuration, resolving the path as documented above
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit_path)?;
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::config(format!(
                "Failed to read Google Ads config {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse Google Ads config {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    fn resolve_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        std::env::var_os("HOME")
            .map(|home| Path::new(&home).join(DEFAULT_CONFIG_FILE))
            .ok_or_else(|| {
                Error::config(format!(
                    "No config path given, {CONFIG_PATH_ENV} unset, and HOME unavailable"
                ))
            })
    }

    /// Validate the configuration
    ///
    /// Empty credentials fail fast here rather than as a remote 401 later.
    pub fn validate(&self) -> Result<()> {
        if self.developer_token.is_empty() {
            return Err(Error::config("Google Ads developer token is required"));
        }
        if self.access_token.is_empty() {
            return Err(Error::config("Google Ads access token is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleAdsConfig {
        GoogleAdsConfig {
            developer_token: "dev-token-abc".to_string(),
            access_token: "ya29.secret-access".to_string(),
            login_customer_id: Some("9999999999".to_string()),
        }
    }

    #[test]
    fn complete_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let mut c = config();
        c.developer_token.clear();
        assert!(c.validate().is_err());

        let mut c = config();
        c.access_token.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn tokens_not_exposed_in_debug() {
        let debug_str = format!("{:?}", config());
        assert!(!debug_str.contains("dev-token-abc"));
        assert!(!debug_str.contains("ya29.secret-access"));
        assert!(debug_str.contains("GoogleAdsConfig"));
        // The login customer id is not a secret
        assert!(debug_str.contains("9999999999"));
    }

    #[test]
    fn login_customer_id_is_optional_in_json() {
        let parsed: GoogleAdsConfig = serde_json::from_str(
            r#"{"developer_token": "d", "access_token": "a"}"#,
        )
        .unwrap();
        assert_eq!(parsed.login_customer_id, None);
    }
}
