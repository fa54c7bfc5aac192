//! Local configuration.
//!
//! Fiberline talks to two backend functions (checkout-session creation and
//! payment verification) and embeds success/cancel return URLs into the
//! checkout request. Their locations live in `~/.fiberline/config.yml` and
//! can be overridden per-run with `FIBERLINE_*` environment variables, which
//! is how the test suite points the payment bridge at a mock server.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FiberlineError, Result};

/// Placeholder the checkout provider substitutes with the real session id
/// when building the success redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Checkout-session creation endpoint.
    pub checkout_url: String,

    /// Payment verification endpoint.
    pub verify_url: String,

    /// Return URL embedded in the checkout request for successful payment.
    pub success_url: String,

    /// Return URL embedded in the checkout request for a canceled payment.
    pub cancel_url: String,

    /// Named token template requested from the identity provider, if any.
    pub auth_token_template: Option<String>,

    /// HTTP timeout for the payment endpoints, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            checkout_url: "https://api.fiberline.net/functions/create-checkout".to_string(),
            verify_url: "https://api.fiberline.net/functions/verify-payment".to_string(),
            success_url: format!(
                "https://signup.fiberline.net/signup?success=true&session_id={}",
                SESSION_ID_PLACEHOLDER
            ),
            cancel_url: "https://signup.fiberline.net/signup?canceled=true".to_string(),
            auth_token_template: Some("fiberline-backend".to_string()),
            http_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Default config file location (`~/.fiberline/config.yml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".fiberline").join("config.yml"))
    }

    /// Load configuration.
    ///
    /// Order: explicit path if given, else the default path if it exists,
    /// else built-in defaults. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// HTTP timeout as a [`Duration`].
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| FiberlineError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("FIBERLINE_CHECKOUT_URL") {
            self.checkout_url = v;
        }
        if let Ok(v) = std::env::var("FIBERLINE_VERIFY_URL") {
            self.verify_url = v;
        }
        if let Ok(v) = std::env::var("FIBERLINE_SUCCESS_URL") {
            self.success_url = v;
        }
        if let Ok(v) = std::env::var("FIBERLINE_CANCEL_URL") {
            self.cancel_url = v;
        }
        if let Ok(v) = std::env::var("FIBERLINE_TOKEN_TEMPLATE") {
            self.auth_token_template = if v.is_empty() { None } else { Some(v) };
        }
    }
}
