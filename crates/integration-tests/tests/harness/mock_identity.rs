//! Mock identity provider for integration tests
//!
//! Publishes a JWKS for a freshly generated RSA key and mints ID tokens
//! signed with it, shaped like the real provider's.

use std::net::SocketAddr;
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use jwt_compact::alg::Rsa;
use jwt_compact::{AlgorithmExt, Claims, Header, TimeOptions};
use literai_auth::IdTokenClaims;
use rsa::RsaPrivateKey;
use rsa::traits::PublicKeyParts;
use tokio_util::sync::CancellationToken;

/// Project the minted tokens are issued for
pub const PROJECT_ID: &str = "literai-integration";

const KEY_ID: &str = "integration-key";

static SIGNING_KEY: LazyLock<RsaPrivateKey> =
    LazyLock::new(|| RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048).expect("generate RSA key"));

/// Mock identity provider serving its signing keys
pub struct MockIdentity {
    addr: SocketAddr,
    shutdown: CancellationToken,
}

impl MockIdentity {
    pub async fn start() -> anyhow::Result<Self> {
        let public = SIGNING_KEY.to_public_key();
        let jwks = serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "kid": KEY_ID,
                "n": URL_SAFE_NO_PAD.encode(public.n().to_bytes_be()),
                "e": URL_SAFE_NO_PAD.encode(public.e().to_bytes_be()),
            }]
        });

        let app = axum::Router::new().route(
            "/jwks",
            axum::routing::get(move || {
                let jwks = jwks.clone();
                async move { axum::Json(jwks) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown_clone.cancelled().await })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown })
    }

    pub const fn project_id(&self) -> &'static str {
        PROJECT_ID
    }

    pub fn jwks_url(&self) -> String {
        format!("http://{}/jwks", self.addr)
    }

    /// A valid token for `subject`, good for an hour
    pub fn token(&self, subject: &str) -> String {
        let claims = Claims::new(id_claims(subject, PROJECT_ID))
            .set_duration_and_issuance(&TimeOptions::default(), Duration::hours(1));
        sign(&claims)
    }

    /// A token for `subject` that expired an hour ago
    pub fn expired_token(&self, subject: &str) -> String {
        let mut claims = Claims::new(id_claims(subject, PROJECT_ID));
        claims.issued_at = Some(Utc::now() - Duration::hours(2));
        claims.expiration = Some(Utc::now() - Duration::hours(1));
        sign(&claims)
    }

    /// A valid token issued for another project
    pub fn foreign_token(&self, subject: &str) -> String {
        let claims = Claims::new(id_claims(subject, "someone-elses-project"))
            .set_duration_and_issuance(&TimeOptions::default(), Duration::hours(1));
        sign(&claims)
    }
}

impl Drop for MockIdentity {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn id_claims(subject: &str, project_id: &str) -> IdTokenClaims {
    IdTokenClaims {
        issuer: format!("https://securetoken.google.com/{project_id}"),
        audience: project_id.to_owned(),
        subject: subject.to_owned(),
        email: Some(format!("{subject}@example.com")),
    }
}

fn sign(claims: &Claims<IdTokenClaims>) -> String {
    let header = Header::empty().with_key_id(KEY_ID);
    Rsa::rs256().token(&header, claims, &*SIGNING_KEY).expect("sign token")
}
