//! Signed bearer tokens (JWT, HS256).
//!
//! - `encode` mints `sub` / `iat` / `exp` plus caller-supplied extra claims.
//! - `decode` verifies the signature only. Expiry is checked by `is_valid`,
//!   which is the single check the request gate relies on.
//! - Every decode failure collapses into `TokenError::Invalid` so callers can't
//!   tell a malformed token from a bad signature.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

/// HS256 keys shorter than the digest size are rejected at startup.
pub const MIN_SECRET_BYTES: usize = 32;

const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

pub type ExtraClaims = Map<String, Value>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("token signing unavailable: {0}")]
    Encoding(String),

    #[error("claim '{0}' is reserved")]
    ReservedClaim(String),
}

/// Decoded, signature-verified token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

/// Process-wide token codec.
///
/// Built once at startup from the configured secret and shared read-only.
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl TokenCodec {
    /// `secret_b64` is standard-alphabet base64 and must decode to at least
    /// [`MIN_SECRET_BYTES`] bytes.
    pub fn from_base64_secret(secret_b64: &str) -> Result<Self, TokenError> {
        let secret = STANDARD
            .decode(secret_b64.trim())
            .map_err(|_| TokenError::Encoding("signing secret is not valid base64".into()))?;

        Self::from_secret(&secret)
    }

    pub fn from_secret(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::Encoding(format!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes (got {})",
                secret.len()
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn encode(
        &self,
        subject: &str,
        claims: &ExtraClaims,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if let Some(name) = claims
            .keys()
            .find(|k| RESERVED_CLAIMS.contains(&k.as_str()))
        {
            return Err(TokenError::ReservedClaim(name.clone()));
        }

        let iat = now_seconds();
        let ttl = i64::try_from(ttl.as_secs())
            .map_err(|_| TokenError::Encoding("token ttl out of range".into()))?;

        let payload = TokenClaims {
            sub: subject.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
            extra: claims.clone(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign token");
                TokenError::Encoding(e.to_string())
            },
        )
    }

    /// Verify the signature and return the claims. Does not check expiry.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode(token).map(|claims| claims.sub)
    }

    /// Signature verifies, subject equals `expected_subject` exactly, and the
    /// token has not yet expired.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.is_valid_at(token, expected_subject, now_seconds())
    }

    fn is_valid_at(&self, token: &str, expected_subject: &str, now: i64) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.sub == expected_subject && now < claims.exp,
            Err(_) => false,
        }
    }
}

fn now_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
