use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

pub mod policy;

/// Which credential a token represents. Access tokens authenticate requests;
/// refresh tokens may only be exchanged for a new access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id. The only identity carried by the token; everything else
    /// (role included) is re-read from the users table per request.
    pub sub: i64,
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, kind: TokenKind) -> Self {
        let now = Utc::now();
        let security = &config::config().security;
        let ttl = match kind {
            TokenKind::Access => Duration::minutes(security.access_token_ttl_mins),
            TokenKind::Refresh => Duration::days(security.refresh_token_ttl_days),
        };

        Self {
            sub: user_id,
            kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Access + refresh pair issued at login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug)]
pub enum AuthError {
    TokenGeneration(String),
    InvalidToken(String),
    WrongTokenKind,
    InvalidSecret,
    Hash(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::WrongTokenKind => write!(f, "Wrong token kind for this operation"),
            AuthError::InvalidSecret => write!(f, "Invalid JWT secret"),
            AuthError::Hash(msg) => write!(f, "Password hashing error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

fn secret() -> Result<&'static str, AuthError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }
    Ok(secret)
}

pub fn generate_token(user_id: i64, kind: TokenKind) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, kind);
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Issue the access/refresh pair returned by login.
pub fn issue_token_pair(user_id: i64) -> Result<TokenPair, AuthError> {
    Ok(TokenPair {
        access_token: generate_token(user_id, TokenKind::Access)?,
        refresh_token: generate_token(user_id, TokenKind::Refresh)?,
    })
}

/// Validate signature and expiry, and require the expected kind.
pub fn verify_token(token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    if token_data.claims.kind != expected {
        return Err(AuthError::WrongTokenKind);
    }

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, password_hash).map_err(|e| AuthError::Hash(e.to_string()))
}
