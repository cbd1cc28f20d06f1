//! Domain service for registration, login and bearer-token authentication.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Principal, Role, UserId};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Issued on register and on every login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub role: Role,
}

impl TokenResponse {
    #[must_use]
    pub const fn bearer(access_token: String, role: Role) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user and issues its first access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailTaken`] for a duplicate email and
    /// [`AuthError::Validation`] for a malformed email or password.
    async fn register(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError>;

    /// Verifies credentials and rotates the caller's access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError>;

    /// Resolves a bearer token into the calling principal.
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;

    async fn me(&self, principal: Principal) -> Result<UserInfo, AuthError>;
}
