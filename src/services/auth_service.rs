//! Domain service for signup, login, and token refresh.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Covers unknown user, wrong password, and deactivated accounts alike,
    /// so a caller cannot probe which field was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Username or email already taken")]
    DuplicateUser,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

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

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub created_at: String,
}

/// Access and refresh token pair issued at login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateUser`] when the username or email is
    /// already taken, [`AuthError::Validation`] for bad input.
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, AuthError>;

    /// Verifies credentials and issues a fresh access + refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails, for any reason.
    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Exchanges a valid refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError>;

    /// Gets information for an authenticated subject.
    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError>;
}
