//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure:
//! - Password hashing (Argon2id, tunable work factor)
//! - JWT bearer token issuance and verification (HMAC, pinned algorithm)
//! - Authentication coordination
//!
//! Services define their own identity type and embed it in tokens through the
//! generic [`Claims`] payload.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue(&"alice".to_string(), Duration::hours(1)).unwrap();
//! let claims: Claims<String> = handler.verify(&token).unwrap();
//! assert_eq!(claims.user, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims, JwtHandler, PasswordHasher};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     PasswordHasher::new(),
//!     JwtHandler::new(b"secret_key_at_least_32_bytes_long!"),
//!     Duration::hours(24),
//! );
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, &"alice").unwrap();
//!
//! // Validate token
//! let claims: Claims<String> = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.user, "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
