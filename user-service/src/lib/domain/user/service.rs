use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::TokenRejection;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Runtime knobs for [`UserService`], fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct UserServiceSettings {
    /// Upper bound on every credential store call.
    pub store_timeout: Duration,

    /// Re-read the user from the store on every token verification instead
    /// of trusting the snapshot embedded at login.
    pub refresh_identity: bool,
}

/// Domain service implementation for registration, login, and token parsing.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    settings: UserServiceSettings,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token codec
    /// * `settings` - Store timeout and identity refresh policy
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        settings: UserServiceSettings,
    ) -> Self {
        Self {
            repository,
            authenticator,
            settings,
        }
    }

    /// Run a store call under the configured timeout.
    ///
    /// On expiry the in-flight call is dropped and the caller gets `Timeout`
    /// immediately, whether or not the store itself can be cancelled.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>>,
    {
        let result = match tokio::time::timeout(self.settings.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(UserError::Timeout(self.settings.store_timeout)),
        };

        result.map_err(|e| {
            if e.is_infrastructure() {
                tracing::error!(operation, error = %e, "Credential store call failed");
            }
            e
        })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                UserError::from(e)
            })?;

        let user = self
            .bounded(
                "create",
                self.repository.create(&command.username, &password_hash),
            )
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let user = self
            .bounded(
                "find_by_username",
                self.repository.find_by_username(&command.username),
            )
            .await?
            .ok_or_else(|| {
                tracing::debug!(username = %command.username, "Login for unknown username");
                // Same hashing work as a wrong password
                let _ = self.authenticator.verify_without_hash(&command.password);
                UserError::NotFoundByUsername(command.username.to_string())
            })?;

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "Login for inactive account");
            return Err(UserError::InactiveAccount);
        }

        let snapshot = AuthenticatedUser::from(&user);

        let result = self
            .authenticator
            .authenticate(&command.password, &user.password_hash, &snapshot)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(user_id = %user.id, "Login with invalid credentials");
                    UserError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(error = %err, "Token generation failed");
                    UserError::Token(err)
                }
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AccessToken(result.access_token))
    }

    async fn parse_token(&self, token: &str) -> Result<AuthenticatedUser, UserError> {
        let claims: Claims<AuthenticatedUser> =
            self.authenticator.validate_token(token).map_err(|e| {
                tracing::debug!(reason = %e, "Access token rejected");
                UserError::InvalidToken(TokenRejection::from(e))
            })?;

        if !self.settings.refresh_identity {
            return Ok(claims.user);
        }

        let snapshot = claims.user;
        let current = self
            .bounded(
                "find_by_username",
                self.repository.find_by_username(&snapshot.username),
            )
            .await?;

        match current {
            Some(user) if user.id == snapshot.id && user.is_active => {
                Ok(AuthenticatedUser::from(&user))
            }
            _ => {
                tracing::debug!(user_id = %snapshot.id, "Token identity no longer active");
                Err(UserError::InvalidToken(TokenRejection::IdentityRevoked))
            }
        }
    }
}
