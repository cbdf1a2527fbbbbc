use std::time::Duration;

use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Why an access token was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenRejection {
    #[error(transparent)]
    Codec(#[from] JwtError),

    #[error("Identity in token no longer matches an active user")]
    IdentityRevoked,
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    // Expected authentication outcomes
    #[error("User not found with username: {0}")]
    NotFoundByUsername(String),

    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    InactiveAccount,

    /// The rejection reason is kept as the source for server-side
    /// diagnostics; the message itself never names it.
    #[error("Invalid access token")]
    InvalidToken(#[source] TokenRejection),

    // Infrastructure errors
    #[error("Token generation failed: {0}")]
    Token(JwtError),

    #[error("Credential store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl UserError {
    /// Whether this error is an infrastructure fault rather than an expected
    /// rejection of the caller's input.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            UserError::Password(_)
                | UserError::Token(_)
                | UserError::Timeout(_)
                | UserError::DatabaseError(_)
                | UserError::Unknown(_)
        )
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
