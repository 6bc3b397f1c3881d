//! HS256 JWT issuing and validation.

use crate::auth::models::JwtClaims;
use chrono::{Duration, Utc};
use clipvault_core::models::Account;
use clipvault_core::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_days: i64,
}

impl JwtService {
    pub fn new(secret: &str, token_expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_days,
        }
    }

    /// Mint a token carrying the account's id, username, and email.
    pub fn issue_token(&self, account: &Account) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            exp: (now + Duration::days(self.token_expiry_days)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate and decode a token. Expired or malformed tokens are rejected
    /// as `Unauthorized`; nothing is revoked before its natural expiry.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid or expired token".to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
