use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// CORS configuration
///
/// Defaults to the browser origins the LiterAI client is served from, with
/// credentials allowed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (wildcard "*" or explicit list)
    #[serde(default = "default_origins")]
    pub origins: AnyOrArray,
    /// Allowed HTTP methods (wildcard "*" or explicit list)
    #[serde(default = "default_methods")]
    pub methods: AnyOrArray,
    /// Allowed request headers (wildcard "*" or explicit list)
    #[serde(default = "default_headers")]
    pub headers: AnyOrArray,
    /// Allow credentialed requests
    #[serde(default = "default_credentials")]
    pub credentials: bool,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_origins(),
            methods: default_methods(),
            headers: default_headers(),
            credentials: default_credentials(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either a wildcard "*" or explicit list of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyOrArray {
    /// Match any value
    Any,
    /// Explicit list
    List(Vec<String>),
}

impl AnyOrArray {
    fn list(values: &[&str]) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<'de> Deserialize<'de> for AnyOrArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let values = match Raw::deserialize(deserializer)? {
            Raw::One(value) => vec![value],
            Raw::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Ok(Self::Any)
        } else {
            Ok(Self::List(values))
        }
    }
}

fn default_origins() -> AnyOrArray {
    AnyOrArray::list(&["http://localhost:5173", "http://127.0.0.1:5173", "https://liter-ai.vercel.app"])
}

fn default_methods() -> AnyOrArray {
    AnyOrArray::list(&["GET", "POST", "OPTIONS"])
}

fn default_headers() -> AnyOrArray {
    AnyOrArray::list(&["Content-Type", "Authorization"])
}

#[allow(clippy::missing_const_for_fn)]
fn default_credentials() -> bool {
    true
}
