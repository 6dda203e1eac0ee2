//! Signed access and refresh tokens
//!
//! Both token kinds are HMAC-SHA256 JWTs with distinct secrets and
//! lifetimes. Access tokens carry identity claims for stateless
//! verification; refresh tokens carry only the subject id and are
//! additionally checked against the value stored on the user record.

use alumconnect_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Role, User};

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Token issuer
    pub iss: String,
    /// Subject - user id
    pub sub: String,
    /// User's email address
    pub email: String,
    /// User's display name
    pub name: String,
    /// User's role
    pub role: Role,
    /// Issued at (Unix epoch seconds)
    pub iat: u64,
    /// Expiration (Unix epoch seconds)
    pub exp: u64,
}

/// Refresh token claims: subject id only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub iss: String,
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

fn now_secs() -> Result<u64, JwtError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

fn decode_error(e: jsonwebtoken::errors::Error) -> JwtError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    }
}

/// Issue an access token for an authenticated user.
pub fn issue_access(config: &AuthConfig, user: &User) -> Result<String, JwtError> {
    let now = now_secs()?;
    let claims = AccessClaims {
        iss: config.issuer.clone(),
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role(),
        iat: now,
        exp: now + config.access_expiry_secs,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )?)
}

/// Issue a refresh token carrying only the subject id.
pub fn issue_refresh(config: &AuthConfig, user_id: Uuid) -> Result<String, JwtError> {
    let now = now_secs()?;
    let claims = RefreshClaims {
        iss: config.issuer.clone(),
        sub: user_id.to_string(),
        iat: now,
        exp: now + config.refresh_expiry_secs,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )?)
}

/// Verify an access token. Fails closed on any malformed, expired, or
/// mis-signed input.
pub fn verify_access(config: &AuthConfig, token: &str) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_secret.as_bytes()),
        &validation,
    )
    .map_err(decode_error)?;

    Ok(data.claims)
}

/// Verify a refresh token's signature and expiry. Callers must still check
/// it against the value stored on the user record.
pub fn verify_refresh(config: &AuthConfig, token: &str) -> Result<RefreshClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        &validation,
    )
    .map_err(decode_error)?;

    Ok(data.claims)
}
