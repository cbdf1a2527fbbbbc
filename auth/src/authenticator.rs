use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Owns the process-wide signing key and token lifetime; both are fixed at
/// construction and never change afterwards.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    /// Hash with the configured work factor that no caller knows the password to
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

const DECOY_PASSWORD: &str = "decoy-password-never-stored";

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher carrying the configured work factor
    /// * `jwt_handler` - Token codec carrying the signing key and algorithm
    /// * `token_ttl` - Lifetime of every issued access token
    pub fn new(
        password_hasher: PasswordHasher,
        jwt_handler: JwtHandler,
        token_ttl: Duration,
    ) -> Self {
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD).ok();

        Self {
            password_hasher,
            jwt_handler,
            token_ttl,
            decoy_hash,
        }
    }

    /// Lifetime applied to issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate a JWT embedding `user`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user` - Identity snapshot to embed in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or the hash is unreadable
    /// * `JwtError` - Token generation failed
    pub fn authenticate<U: Serialize>(
        &self,
        password: &str,
        stored_hash: &str,
        user: &U,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(user, self.token_ttl)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Spend the same verification work as [`authenticate`](Self::authenticate)
    /// when there is no stored hash to check against.
    ///
    /// Always returns `false`. Keeps a login for an unknown username from
    /// answering faster than one with a wrong password.
    pub fn verify_without_hash(&self, password: &str) -> bool {
        if let Some(decoy_hash) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, decoy_hash);
        }
        false
    }

    /// Generate JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token<U: Serialize>(&self, user: &U) -> Result<String, JwtError> {
        self.jwt_handler.issue(user, self.token_ttl)
    }

    /// Validate and decode JWT token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token<U: DeserializeOwned>(&self, token: &str) -> Result<Claims<U>, JwtError> {
        self.jwt_handler.verify(token)
    }
}
