use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user authentication operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user, storing only a hash of the password.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Hashing failed; nothing was stored
    /// * `Timeout` - Store did not answer in time
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Check credentials and issue an access token.
    ///
    /// # Arguments
    /// * `command` - Username and plaintext password
    ///
    /// # Returns
    /// Signed access token embedding the user snapshot
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `InactiveAccount` - User exists but is deactivated
    /// * `InvalidCredentials` - Password does not match
    /// * `Timeout` - Store did not answer in time
    /// * `DatabaseError` - Database operation failed
    /// * `Token` - Token could not be signed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError>;

    /// Resolve the identity carried by an access token.
    ///
    /// # Arguments
    /// * `token` - Raw bearer token
    ///
    /// # Returns
    /// Identity snapshot embedded at issuance
    ///
    /// # Errors
    /// * `InvalidToken` - Expired, malformed, or badly signed token
    /// * `Timeout` / `DatabaseError` - Only when identity refresh is enabled
    async fn parse_token(&self, token: &str) -> Result<AuthenticatedUser, UserError>;
}

/// Credential store operations required by the authentication core.
///
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `username` - Unique username
    /// * `password_hash` - Hash to store in place of the password
    ///
    /// # Returns
    /// Created user entity with store-assigned id and timestamps
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, username: &Username, password_hash: &str) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
}
