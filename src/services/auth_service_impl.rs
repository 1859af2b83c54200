//! `SeaORM` implementation of the `AuthService` trait.

use crate::auth::TokenService;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, TokenPair, UserInfo};
use async_trait::async_trait;
use tracing::info;

const MAX_USERNAME_LEN: usize = 25;
const MAX_EMAIL_LEN: usize = 50;
const MIN_PASSWORD_LEN: usize = 8;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenService,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

fn validate_signup(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(AuthError::Validation(format!(
            "Username must be 1-{MAX_USERNAME_LEN} characters"
        )));
    }

    if email.is_empty() || email.len() > MAX_EMAIL_LEN || !email.contains('@') {
        return Err(AuthError::Validation(format!(
            "Email must be a valid address of at most {MAX_EMAIL_LEN} characters"
        )));
    }

    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserInfo, AuthError> {
        validate_signup(username, email, password)?;

        if self.store.username_or_email_taken(username, email).await? {
            return Err(AuthError::DuplicateUser);
        }

        let user = self.store.create_user(username, email, password).await?;

        info!("New user signed up: {}", user.username);

        Ok(UserInfo {
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
            created_at: user.created_at,
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        // Unknown user, bad password, and deactivated account all collapse
        // into the same InvalidCredentials.
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = self
            .store
            .verify_password(&user.password_hash, password)
            .await?;

        if !is_valid || !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self
            .tokens
            .issue_access(&user.username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self
            .tokens
            .issue_refresh(&user.username)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!("User logged in: {}", user.username);

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let subject = self
            .tokens
            .verify_refresh(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        // The subject must still resolve to a live account.
        let user = self
            .store
            .find_user_by_username(&subject)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !user.is_active {
            return Err(AuthError::InvalidToken);
        }

        self.tokens
            .issue_access(&user.username)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    async fn get_user_info(&self, username: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo {
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
            created_at: user.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_validation_bounds() {
        assert!(validate_signup("alice", "a@x.com", "password1").is_ok());
        assert!(validate_signup("", "a@x.com", "password1").is_err());
        assert!(validate_signup(&"a".repeat(26), "a@x.com", "password1").is_err());
        assert!(validate_signup("alice", "not-an-email", "password1").is_err());
        assert!(validate_signup("alice", &format!("{}@x.com", "a".repeat(50)), "password1").is_err());
        assert!(validate_signup("alice", "a@x.com", "short").is_err());
    }
}
