pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Claims embedded in every access token. Tokens are stateless; the
/// signing secret and expiry come from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the username
    pub sub: String,
    /// Role tag, e.g. "admin" or "user"
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token id for audit trails
    pub jti: String,
}

impl Claims {
    pub fn new(username: String, role: String) -> Self {
        let now = Utc::now();
        let expiry_mins = config::config().security.jwt_expiry_mins;
        Self {
            sub: username,
            role,
            exp: (now + Duration::minutes(expiry_mins)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign the claims with the configured HS256 secret.
pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    encode_with_secret(claims, secret)
}

/// Validate signature and expiry, returning the embedded claims.
pub fn decode_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    decode_with_secret(token, secret)
}

fn encode_with_secret(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    // Validation::default() is HS256 and checks exp
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn test_claims(exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "reich".to_string(),
            role: "admin".to_string(),
            exp: now + exp_offset_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn round_trip_preserves_identity() {
        let claims = test_claims(900);
        let token = encode_with_secret(&claims, SECRET).expect("encode");
        let decoded = decode_with_secret(&token, SECRET).expect("decode");
        assert_eq!(decoded.sub, "reich");
        assert_eq!(decoded.role, "admin");
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expired well beyond the default 60-second leeway.
        let claims = test_claims(-300);
        let token = encode_with_secret(&claims, SECRET).expect("encode");
        assert!(decode_with_secret(&token, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = test_claims(900);
        let token = encode_with_secret(&claims, SECRET).expect("encode");
        assert!(decode_with_secret(&token, "another-secret").is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = test_claims(900);
        let token = encode_with_secret(&claims, SECRET).expect("encode");
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('A');
        assert!(decode_with_secret(&tampered, SECRET).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = test_claims(900);
        assert!(matches!(
            encode_with_secret(&claims, ""),
            Err(JwtError::InvalidSecret)
        ));
    }
}
