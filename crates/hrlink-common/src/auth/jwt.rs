//! JWT session verification
//!
//! Provides token encoding, decoding, and validation using the `jsonwebtoken`
//! crate, plus the default [`SessionVerifier`] implementation handed to the
//! gateway at startup.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hrlink_core::{CollabResult, DomainError, Role, SessionVerifier, UserId, UserIdentity};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Username, cached in the token at login time
    pub username: String,
    /// Role tags held at login time
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Get the user ID from the subject
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a user id
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Check if the token is expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT service for encoding and decoding session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and expiry (seconds)
    #[must_use]
    pub fn new(secret: &str, token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry,
        }
    }

    /// Issue a session token for a user identity
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_token(&self, identity: &UserIdentity) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
            username: identity.username.clone(),
            roles: identity.roles.iter().map(|r| r.as_str().to_string()).collect(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::internal)
    }

    /// Validate a session token and return its claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            },
        )?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

/// Default auth collaborator: verifies JWT session tokens.
#[derive(Debug, Clone)]
pub struct JwtSessionVerifier {
    service: JwtService,
}

impl JwtSessionVerifier {
    #[must_use]
    pub fn new(service: JwtService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, token: &str) -> CollabResult<UserIdentity> {
        // Remove "Bearer " prefix if present
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let claims = self.service.validate_token(token).map_err(|e| match e {
            AppError::TokenExpired => DomainError::SessionExpired,
            _ => DomainError::InvalidSession,
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::InvalidSession)?;

        Ok(UserIdentity::new(user_id, claims.username).with_roles(
            claims.roles.iter().map(|r| Role::new(r.clone())).collect(),
        ))
    }
}
