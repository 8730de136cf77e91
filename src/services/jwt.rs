//! # JWT Service
//!
//! This module issues and validates the short-lived access tokens handed out
//! at signup. Tokens carry the user id as subject and are signed with HMAC.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::utils::constant::ACCESS_TOKEN_EXPIRY;

/// Errors that can occur during JWT operations
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
}

/// JWT claims structure for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as string)
    pub sub: String,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
}

/// Access token returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Access token expiry time in seconds
    pub expires_in: u64,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(encoding_key: EncodingKey, decoding_key: DecodingKey) -> Self {
        Self {
            encoding_key,
            decoding_key,
        }
    }

    /// Builds a service signing and verifying with the same HMAC secret.
    pub fn from_secret(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self::new(
            EncodingKey::from_secret(bytes),
            DecodingKey::from_secret(bytes),
        )
    }

    /// Creates an access token for the user.
    #[instrument(skip(self))]
    pub fn create_access_token(&self, user_id: Uuid) -> Result<AccessToken, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System time should not be before UNIX EPOCH")
            .as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + ACCESS_TOKEN_EXPIRY.as_secs(),
            iat: now,
        };
        let access_token = encode(&Header::default(), &claims, &self.encoding_key)?;
        trace!("Access token created");

        Ok(AccessToken {
            access_token,
            expires_in: ACCESS_TOKEN_EXPIRY.as_secs(),
        })
    }

    /// Validates an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// - [`JwtError::TokenExpired`] - Token has expired
    /// - [`JwtError::InvalidToken`] - Token is malformed or has invalid signature
    #[instrument(skip_all, fields(token_length = token.len()))]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => {
                trace!(user_id = %token_data.claims.sub, "Access token validated successfully");
                Ok(token_data.claims)
            }
            Err(e) if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                debug!("Access token expired");
                Err(JwtError::TokenExpired)
            }
            Err(e) => {
                debug!(error = %e, "Invalid access token");
                Err(JwtError::InvalidToken)
            }
        }
    }
}
