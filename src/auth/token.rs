//! Bearer token codec.
//!
//! Tokens are HS256 JWTs carrying the identity, its upload capability and an
//! expiry. They are stateless: a token is valid when its signature checks out,
//! its issuer matches and it has not expired. There is no revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::Identity;
use crate::{Result, ShelfError};

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (identity ID).
    pub sub: i64,
    /// Identity email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Upload capability at issuance time.
    pub can_upload: bool,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

/// Signs and verifies bearer tokens with a process-wide symmetric key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl TokenCodec {
    /// Create a codec from the signing secret and the expected issuer.
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
        }
    }

    /// Issue a token for `identity` that expires `ttl` from now.
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: identity.id,
            email: identity.email.clone(),
            name: identity.display_name.clone(),
            can_upload: identity.can_upload,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {}", e);
            ShelfError::Internal("failed to issue token".to_string())
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Fails closed: any structural, signature, issuer or expiry problem
    /// yields `None`. A token is only valid while `exp` is strictly in the
    /// future.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        let data = match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Token validation failed: {}", e);
                return None;
            }
        };

        if data.claims.exp <= Utc::now().timestamp() {
            tracing::debug!("Token expired at {}", data.claims.exp);
            return None;
        }

        Some(data.claims)
    }
}
