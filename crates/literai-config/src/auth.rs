use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Google's published signing keys for Firebase ID tokens
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Bearer-token authentication against the identity provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Whether protected endpoints require a verified ID token
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Service-account credential, either inline JSON or a path to a JSON file
    #[serde(default)]
    pub service_account: Option<SecretString>,

    /// Environment variable to read the service-account credential from
    ///
    /// Read after parsing, so inline JSON never passes through TOML quoting.
    /// Used only when `service_account` is empty.
    #[serde(default)]
    pub service_account_env: Option<String>,

    /// Project id tokens must be issued for; overrides the service account
    #[serde(default)]
    pub project_id: Option<String>,

    /// JWKS endpoint serving the token signing keys
    #[serde(default = "default_jwks_url")]
    pub jwks_url: Url,

    /// How long fetched signing keys are trusted before refetching
    #[serde(default = "default_key_refresh", deserialize_with = "duration_str::deserialize_duration")]
    pub key_refresh: Duration,

    /// Paths that skip authentication
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            service_account: None,
            service_account_env: None,
            project_id: None,
            jwks_url: default_jwks_url(),
            key_refresh: default_key_refresh(),
            public_paths: default_public_paths(),
        }
    }
}

impl AuthConfig {
    /// Service-account source, ignoring empty values left by env defaults
    pub fn service_account(&self) -> Option<&SecretString> {
        crate::non_empty_secret(self.service_account.as_ref())
    }

    /// Fill `service_account` from `service_account_env` when it is set
    pub(crate) fn load_service_account_env(&mut self) {
        if self.service_account().is_some() {
            return;
        }

        let Some(var_name) = self.service_account_env.as_deref() else {
            return;
        };

        if let Ok(value) = std::env::var(var_name)
            && !value.trim().is_empty()
        {
            self.service_account = Some(SecretString::from(value));
        }
    }

    /// Explicit project id, ignoring blank values
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_jwks_url() -> Url {
    Url::parse(FIREBASE_JWKS_URL).expect("default JWKS URL is valid")
}

const fn default_key_refresh() -> Duration {
    Duration::from_secs(300)
}

fn default_public_paths() -> Vec<String> {
    vec!["/api/health".to_string()]
}
