//! JWT access-token issuance and validation (HS256)
//!
//! Wire decoding goes through a loosely-typed claim map; the canonical
//! typed [`AccessClaims`] struct is the only internal representation.

use crate::{config::AppConfig, error::AppError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Token validation failure kinds
///
/// Callers get the precise reason; the HTTP layer collapses all of
/// these into one uniform 401 so the distinction never leaks outward.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("signature or signing algorithm rejected")]
    BadSignature,

    #[error("expiry claim absent or not numeric")]
    MissingExpiry,

    #[error("token expired")]
    Expired,

    #[error("issuer mismatch")]
    WrongIssuer,
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        tracing::debug!(error = %e, "Access token rejected");
        AppError::Unauthorized
    }
}

/// Access-token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject user ID
    pub user_id: i64,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl AccessClaims {
    pub fn new(user_id: i64, now: DateTime<Utc>, window_secs: u64, issuer: &str) -> Self {
        Self {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(window_secs as i64)).timestamp(),
            iss: issuer.to_string(),
        }
    }

    /// Build typed claims from the decoded wire map with explicit field
    /// validation. The map form never travels further than this call.
    pub fn from_wire(map: &serde_json::Map<String, Value>) -> Result<Self, TokenError> {
        let user_id = map
            .get("user_id")
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;

        let exp = map
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(TokenError::MissingExpiry)?;

        let iat = map
            .get("iat")
            .and_then(Value::as_i64)
            .ok_or(TokenError::Malformed)?;

        let iss = map
            .get("iss")
            .and_then(Value::as_str)
            .ok_or(TokenError::WrongIssuer)?
            .to_string();

        Ok(Self {
            user_id,
            iat,
            exp,
            iss,
        })
    }

    /// Shared validity rules for both the wire-map and the typed form.
    ///
    /// Expiry is a strict comparison against Unix time: a token checked
    /// exactly at its expiry instant is still valid.
    pub fn check_validity(&self, now: DateTime<Utc>, issuer: &str) -> Result<(), TokenError> {
        if self.iss != issuer {
            return Err(TokenError::WrongIssuer);
        }

        if now.timestamp() > self.exp {
            return Err(TokenError::Expired);
        }

        Ok(())
    }
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_exp_secs: u64,
    issuer: String,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_exp_secs", &self.access_token_exp_secs)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret too short (min 32 chars)".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_exp_secs: config.security.access_token_exp_secs,
            issuer: config.security.jwt_issuer.clone(),
        })
    }

    /// Generate a signed access token for the given user
    pub fn issue(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = AccessClaims::new(user_id, now, self.access_token_exp_secs, &self.issuer);

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal(format!("Failed to encode access token: {}", e))
        })
    }

    /// Validate a token string and return its claims
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let map = self.decode_wire(token)?;
        let claims = AccessClaims::from_wire(&map)?;
        claims.check_validity(now, &self.issuer)?;
        Ok(claims)
    }

    /// Decode the wire form into a claim map, checking only the
    /// signature. Only HS256 is accepted; expiry and issuer checks are
    /// done on the typed claims so both forms share one rule set.
    fn decode_wire(&self, token: &str) -> Result<serde_json::Map<String, Value>, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        decode::<serde_json::Map<String, Value>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Seconds until a freshly issued access token expires
    pub fn expires_in(&self) -> u64 {
        self.access_token_exp_secs
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
