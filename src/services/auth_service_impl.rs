//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::Utc;

use crate::config::{AuthConfig, SecurityConfig};
use crate::db::Store;
use crate::domain::{Principal, Role};
use crate::services::auth_service::{AuthError, AuthService, TokenResponse, UserInfo};

pub struct SeaOrmAuthService {
    store: Store,
    auth: AuthConfig,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, auth: AuthConfig, security: SecurityConfig) -> Self {
        Self {
            store,
            auth,
            security,
        }
    }

    fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        let len = password.chars().count();
        let (min, max) = (self.auth.min_password_length, self.auth.max_password_length);

        if len < min || len > max {
            return Err(AuthError::Validation(format!(
                "Password must be between {min} and {max} characters"
            )));
        }
        Ok(())
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::Validation(format!("Invalid email: {email}")));
        }
        self.validate_password(password)?;

        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let role = self.auth.default_role.parse().unwrap_or(Role::User);
        let user = self
            .store
            .create_user(email, password, role, &self.security)
            .await?
            .ok_or(AuthError::EmailTaken)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(TokenResponse::bearer(user.access_token, user.role))
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .store
            .verify_user_password(email.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let user = self.store.rotate_access_token(user.id).await?;

        Ok(TokenResponse::bearer(user.access_token, user.role))
    }

    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let user = self
            .store
            .get_user_by_token(token)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let lifetime = i64::try_from(self.auth.access_token_expire_minutes).unwrap_or(i64::MAX);
        let age = Utc::now().signed_duration_since(user.token_issued_at);
        if age.num_minutes() >= lifetime {
            return Err(AuthError::TokenExpired);
        }

        Ok(Principal {
            id: user.id,
            role: user.role,
        })
    }

    async fn me(&self, principal: Principal) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_id(principal.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(UserInfo {
            id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann@@example.com"));
        assert!(!is_valid_email("ann smith@example.com"));
        assert!(!is_valid_email("ann@.com"));
    }
}
