use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtHeader, Role, Session, SessionClaims};
use shared_models::error::AppError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Session secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Invalid claims format")]
    InvalidClaims,

    #[error("Token expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => AppError::Internal(err.to_string()),
            _ => AppError::Auth(err.to_string()),
        }
    }
}

fn sign(signing_input: &str, secret: &str) -> Result<HmacSha256, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::MissingSecret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

/// Issues a signed HS256 session token. Returns the token and its expiry.
pub fn issue_token(
    subject: &str,
    role: Role,
    name: Option<&str>,
    secret: &str,
    ttl: Duration,
) -> Result<(String, DateTime<Utc>), TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = Utc::now();
    let expires_at = now + ttl;

    let header = JwtHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let claims = SessionClaims {
        sub: subject.to_string(),
        role,
        name: name.map(str::to_string),
        iat: now.timestamp().max(0) as u64,
        exp: expires_at.timestamp().max(0) as u64,
    };

    let header_json = serde_json::to_string(&header).map_err(|_| TokenError::InvalidClaims)?;
    let claims_json = serde_json::to_string(&claims).map_err(|_| TokenError::InvalidClaims)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input, secret)?.finalize().into_bytes();

    Ok((
        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)),
        expires_at,
    ))
}

pub fn validate_token(token: &str, secret: &str) -> Result<Session, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }

    let (header_b64, claims_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::Malformed
    })?;

    let signing_input = format!("{}.{}", header_b64, claims_b64);
    if sign(&signing_input, secret)?.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::InvalidClaims)?;
    let claims: SessionClaims = serde_json::from_slice(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::InvalidClaims
    })?;

    let now = Utc::now().timestamp().max(0) as u64;
    if claims.exp <= now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(TokenError::Expired);
    }

    let session = Session {
        subject: claims.sub,
        role: claims.role,
        name: claims.name,
        expires_at: Utc.timestamp_opt(claims.exp as i64, 0).single(),
    };

    debug!("Token validated for {} {}", session.role, session.subject);
    Ok(session)
}
