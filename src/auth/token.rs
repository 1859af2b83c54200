//! Signed token issuance and verification.
//!
//! Two token kinds exist: short-lived access tokens authorizing individual
//! requests, and long-lived refresh tokens used solely to mint a new access
//! token. Each kind is HS256-signed with its own secret, so one can never be
//! presented where the other is expected.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 30;
pub const REFRESH_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Claims embedded in every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username the token was issued for.
    pub sub: String,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp.
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// Issues and verifies access and refresh tokens.
///
/// Keys are derived from the configured secrets once at construction;
/// expiry durations and the signing algorithm are fixed, never negotiated
/// per request.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenService {
    #[must_use]
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }

    pub fn issue_access(&self, subject: &str) -> Result<String, TokenError> {
        issue(subject, ACCESS_TOKEN_TTL_MINUTES, &self.access_encoding)
    }

    pub fn issue_refresh(&self, subject: &str) -> Result<String, TokenError> {
        issue(subject, REFRESH_TOKEN_TTL_MINUTES, &self.refresh_encoding)
    }

    /// Verifies an access token and returns its subject.
    pub fn verify_access(&self, token: &str) -> Result<String, TokenError> {
        verify(token, &self.access_decoding)
    }

    /// Verifies a refresh token and returns its subject.
    pub fn verify_refresh(&self, token: &str) -> Result<String, TokenError> {
        verify(token, &self.refresh_decoding)
    }
}

fn issue(subject: &str, ttl_minutes: i64, key: &EncodingKey) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        iat: now.timestamp(),
    };

    encode(&Header::default(), &claims, key)
        .map_err(|e| TokenError::GenerationFailed(e.to_string()))
}

fn verify(token: &str, key: &DecodingKey) -> Result<String, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["sub", "exp"]);

    let data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed(e.to_string()),
    })?;

    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            "access-secret-for-tests-0123456789ab",
            "refresh-secret-for-tests-0123456789a",
        )
    }

    #[test]
    fn access_token_round_trip() {
        let tokens = service();
        let token = tokens.issue_access("alice").unwrap();
        assert_eq!(tokens.verify_access(&token).unwrap(), "alice");
    }

    #[test]
    fn refresh_token_round_trip() {
        let tokens = service();
        let token = tokens.issue_refresh("alice").unwrap();
        assert_eq!(tokens.verify_refresh(&token).unwrap(), "alice");
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let tokens = service();

        let refresh = tokens.issue_refresh("alice").unwrap();
        assert!(matches!(
            tokens.verify_access(&refresh),
            Err(TokenError::InvalidSignature)
        ));

        let access = tokens.issue_access("alice").unwrap();
        assert!(matches!(
            tokens.verify_refresh(&access),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        // Two minutes past expiry, beyond the validator's clock-skew leeway.
        let token = issue("alice", -2, &tokens.access_encoding).unwrap();
        assert!(matches!(
            tokens.verify_access(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn token_valid_until_expiry() {
        let tokens = service();
        let token = issue("alice", 1, &tokens.access_encoding).unwrap();
        assert_eq!(tokens.verify_access(&token).unwrap(), "alice");
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service();
        assert!(matches!(
            tokens.verify_access("not.a.token"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn forged_signature_is_rejected() {
        let tokens = service();
        let other = TokenService::new(
            "a-completely-different-access-secret",
            "a-completely-different-refresh-key-x",
        );
        let token = other.issue_access("alice").unwrap();
        assert!(matches!(
            tokens.verify_access(&token),
            Err(TokenError::InvalidSignature)
        ));
    }
}
