use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jwt_compact::alg::RsaPublicKey;
use mini_moka::sync::Cache;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::AuthError;

/// Shortest gap between two JWKS fetches
///
/// Unknown key ids inside this window are rejected without a fetch, so forged
/// `kid` headers cannot turn inbound requests into outbound ones.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

/// Public keys by key id (`kid`)
pub type KeySet = HashMap<String, RsaPublicKey>;

/// Token signing keys published by the identity provider
///
/// Fetched from a JWKS endpoint and trusted for the configured refresh
/// interval. An unknown key id triggers a refetch, which picks up rotated
/// keys before their cached set expires, but never more often than once per
/// [`MIN_REFETCH_INTERVAL`].
#[derive(Clone)]
pub struct SigningKeys {
    inner: Source,
}

#[derive(Clone)]
enum Source {
    Remote(Arc<RemoteKeys>),
    #[cfg(test)]
    Fixed(Arc<KeySet>),
}

struct RemoteKeys {
    http: reqwest::Client,
    jwks_url: url::Url,
    cache: Cache<(), Arc<KeySet>>,
    min_refetch: Duration,
    // Time of the last fetch attempt; also serializes fetches
    last_fetch: Mutex<Option<Instant>>,
}

impl SigningKeys {
    /// Keys served from a JWKS endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn remote(jwks_url: url::Url, refresh_interval: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(5)).build()?;

        let cache = Cache::builder().time_to_live(refresh_interval).max_capacity(1).build();

        Ok(Self {
            inner: Source::Remote(Arc::new(RemoteKeys {
                http,
                jwks_url,
                cache,
                // A cached set that expired must always be refetchable
                min_refetch: refresh_interval.min(MIN_REFETCH_INTERVAL),
                last_fetch: Mutex::new(None),
            })),
        })
    }

    #[cfg(test)]
    pub(crate) fn fixed(keys: KeySet) -> Self {
        Self {
            inner: Source::Fixed(Arc::new(keys)),
        }
    }

    /// Look up the verifying key for a key id
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for unknown key ids and
    /// `AuthError::KeyFetch` when the key set cannot be retrieved
    pub async fn get(&self, kid: &str) -> Result<RsaPublicKey, AuthError> {
        match &self.inner {
            Source::Remote(remote) => remote.get(kid).await,
            #[cfg(test)]
            Source::Fixed(keys) => keys
                .get(kid)
                .cloned()
                .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id `{kid}`"))),
        }
    }
}

impl RemoteKeys {
    async fn get(&self, kid: &str) -> Result<RsaPublicKey, AuthError> {
        if let Some(key) = self.cache.get(&()).and_then(|keys| keys.get(kid).cloned()) {
            return Ok(key);
        }

        let mut last_fetch = self.last_fetch.lock().await;

        // Another task may have refreshed while we waited
        let cached = self.cache.get(&());
        if let Some(key) = cached.as_ref().and_then(|keys| keys.get(kid).cloned()) {
            return Ok(key);
        }

        if last_fetch.is_some_and(|at| at.elapsed() < self.min_refetch) {
            tracing::debug!(kid = %kid, "unknown key id within refetch interval");
            return Err(match cached {
                Some(_) => AuthError::InvalidToken(format!("unknown key id `{kid}`")),
                None => AuthError::KeyFetch("signing keys are temporarily unavailable".to_string()),
            });
        }

        *last_fetch = Some(Instant::now());
        let keys = Arc::new(self.fetch().await?);
        self.cache.insert((), Arc::clone(&keys));

        keys.get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id `{kid}`")))
    }

    async fn fetch(&self) -> Result<KeySet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "fetching token signing keys");

        let response = self
            .http
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyFetch(format!("JWKS endpoint returned {status}")));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("failed to parse JWKS: {e}")))?;

        let keys = parse_key_set(jwks);
        tracing::debug!(count = keys.len(), "token signing keys refreshed");

        Ok(keys)
    }
}

/// JSON Web Key Set document
#[derive(Debug, Deserialize)]
pub(crate) struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Single JSON Web Key; only the RSA members are read
#[derive(Debug, Deserialize)]
pub(crate) struct Jwk {
    pub kid: Option<String>,
    pub kty: String,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

/// Convert the RSA keys of a JWKS into verifying keys, skipping anything unusable
pub(crate) fn parse_key_set(jwks: JwkSet) -> KeySet {
    jwks.keys
        .into_iter()
        .filter_map(|jwk| {
            let kid = jwk.kid.clone()?;
            match rsa_key(&jwk) {
                Ok(key) => Some((kid, key)),
                Err(e) => {
                    tracing::warn!(kid = %kid, error = %e, "skipping unusable signing key");
                    None
                }
            }
        })
        .collect()
}

fn rsa_key(jwk: &Jwk) -> anyhow::Result<RsaPublicKey> {
    if jwk.kty != "RSA" {
        anyhow::bail!("unsupported key type {}", jwk.kty);
    }

    let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
        anyhow::bail!("RSA key without modulus or exponent");
    };

    let n = URL_SAFE_NO_PAD.decode(n.trim_end_matches('='))?;
    let e = URL_SAFE_NO_PAD.decode(e.trim_end_matches('='))?;

    Ok(RsaPublicKey::new(
        rsa::BigUint::from_bytes_be(&n),
        rsa::BigUint::from_bytes_be(&e),
    )?)
}
