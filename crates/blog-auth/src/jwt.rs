//! Session token codec.
//!
//! Tokens are HS256 JWTs whose payload is [`Claims`]. The codec is built once
//! from [`JwtConfig`] and shared read-only; verification is a pure function of
//! the token, the secret and the supplied clock.
//!
//! Verification classifies failures:
//!
//! - [`TokenError::Malformed`]: not three segments, undecodable header or
//!   payload, or required claims missing
//! - [`TokenError::InvalidSignature`]: header algorithm other than `HS256`
//!   (including `none`) or a MAC mismatch
//! - [`TokenError::Expired`]: the current time is past `exp`
//!
//! A token stays valid up to and including its expiry second.

use std::fmt;
use std::sync::Arc;

use blog_config::JwtConfig;
use blog_config::jwt::MAX_TOKEN_TTL_HOURS;
use chrono::{DateTime, Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;
use thiserror::Error;

use crate::claims::Claims;
use crate::roles::RoleSet;

const EXPECTED_ALG: &str = "HS256";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short label used in logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::Signing(_) => "signing",
        }
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

/// Issues and verifies session tokens with a process-wide secret.
///
/// Cloning is cheap; all clones share the same keys.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<Keys>,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation,
                ttl,
            }),
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        let hours = config.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS);
        Self::new(config.secret.as_bytes(), Duration::hours(hours))
    }

    /// Default lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        self.keys.ttl
    }

    pub fn issue(&self, subject_id: u64, roles: &RoleSet, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject_id, roles, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject_id: u64,
        roles: &RoleSet,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;

        let claims = Claims {
            sub: subject_id,
            roles: roles.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        if header_algorithm(header)? != EXPECTED_ALG {
            return Err(TokenError::InvalidSignature);
        }

        // Any Base64 failure reported by the decoder below must then come
        // from the signature segment.
        BASE64URL_NOPAD
            .decode(payload.as_bytes())
            .map_err(|_| TokenError::Malformed)?;

        let data = decode::<Claims>(token, &self.keys.decoding, &self.keys.validation)
            .map_err(|e| classify(e.kind()))?;

        if now.timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.keys.ttl)
            .finish_non_exhaustive()
    }
}

fn header_algorithm(segment: &str) -> Result<String, TokenError> {
    let bytes = BASE64URL_NOPAD
        .decode(segment.as_bytes())
        .map_err(|_| TokenError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;
    Ok(header.alg)
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm | ErrorKind::Base64(_) => {
            TokenError::InvalidSignature
        }
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
