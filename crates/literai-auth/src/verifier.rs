use chrono::{TimeDelta, Utc};
use jwt_compact::alg::Rsa;
use jwt_compact::{AlgorithmExt, TimeOptions, UntrustedToken};
use literai_config::AuthConfig;
use literai_core::Identity;
use serde::{Deserialize, Serialize};

use crate::{AuthError, SigningKeys};

/// Tolerated clock skew between us and the identity provider
const CLOCK_LEEWAY: TimeDelta = TimeDelta::seconds(60);

/// Issuer prefix of Firebase ID tokens; the project id is appended
const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Claims carried by an identity-provider ID token
///
/// `exp` and `iat` live in the surrounding [`jwt_compact::Claims`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "aud")]
    pub audience: String,
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Verifies bearer tokens and produces the caller's [`Identity`]
///
/// Stateless per request: every call re-checks signature and claims, only
/// the signing keys are cached.
#[derive(Clone)]
pub struct IdTokenVerifier {
    project_id: String,
    issuer: String,
    keys: SigningKeys,
}

impl IdTokenVerifier {
    pub fn new(project_id: impl Into<String>, keys: SigningKeys) -> Self {
        let project_id = project_id.into();
        let issuer = format!("{ISSUER_PREFIX}{project_id}");

        Self {
            project_id,
            issuer,
            keys,
        }
    }

    /// Build a verifier from the auth configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no project id can be resolved or the key fetcher
    /// cannot be constructed
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let project_id = crate::resolve_project_id(config)?;
        let keys = SigningKeys::remote(config.jwks_url.clone(), config.key_refresh)?;

        tracing::info!(project_id = %project_id, "identity-provider token verification enabled");

        Ok(Self::new(project_id, keys))
    }

    /// Verify an `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` when there is no bearer token and
    /// `AuthError::InvalidToken` when verification fails
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let token = bearer_token(authorization)?;
        self.verify(token).await
    }

    /// Verify a raw ID token
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is malformed, signed by
    /// an unknown key, expired, or issued for another project
    pub async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let untrusted =
            UntrustedToken::new(token).map_err(|e| AuthError::InvalidToken(format!("malformed token: {e}")))?;

        if untrusted.algorithm() != "RS256" {
            return Err(AuthError::InvalidToken(format!(
                "unexpected signing algorithm `{}`",
                untrusted.algorithm()
            )));
        }

        let kid = untrusted
            .header()
            .key_id
            .as_deref()
            .ok_or_else(|| AuthError::InvalidToken("token header has no key id".to_string()))?;

        let key = self.keys.get(kid).await?;

        let token = Rsa::rs256()
            .validator::<IdTokenClaims>(&key)
            .validate(&untrusted)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let claims = token.claims();

        claims
            .validate_expiration(&TimeOptions::default())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if claims.issued_at.is_some_and(|iat| iat > Utc::now() + CLOCK_LEEWAY) {
            return Err(AuthError::InvalidToken("token issued in the future".to_string()));
        }

        self.check_claims(&claims.custom)?;

        Ok(Identity {
            subject: claims.custom.subject.clone(),
            email: claims.custom.email.clone(),
        })
    }

    fn check_claims(&self, claims: &IdTokenClaims) -> Result<(), AuthError> {
        if claims.audience != self.project_id {
            return Err(AuthError::InvalidToken(format!(
                "token audience `{}` does not match project",
                claims.audience
            )));
        }

        if claims.issuer != self.issuer {
            return Err(AuthError::InvalidToken(format!("unexpected issuer `{}`", claims.issuer)));
        }

        if claims.subject.is_empty() || claims.subject.len() > 128 {
            return Err(AuthError::InvalidToken("invalid subject claim".to_string()));
        }

        Ok(())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value
///
/// # Errors
///
/// Returns `AuthError::MissingToken` when the header is absent, uses another
/// scheme, or carries an empty token
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}
