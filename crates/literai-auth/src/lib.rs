//! Identity-provider bearer-token verification
//!
//! Verifies Firebase ID tokens (RS256 JWTs) against the provider's published
//! signing keys and turns them into a request [`Identity`](literai_core::Identity).

mod error;
mod keys;
mod service_account;
mod verifier;

pub use error::AuthError;
pub use keys::SigningKeys;
pub use service_account::{ServiceAccount, resolve_project_id};
pub use verifier::{IdTokenClaims, IdTokenVerifier, bearer_token};
