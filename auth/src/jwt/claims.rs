use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Token payload: expiry plus the identity snapshot taken at issuance.
///
/// Generic over the identity type so each service embeds its own user
/// representation. The snapshot is trusted as-is on verification; it is
/// not refreshed against any store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims<U> {
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Identity snapshot
    pub user: U,
}

impl<U> Claims<U> {
    /// Create claims for `user` expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `user` - Identity snapshot to embed
    /// * `ttl` - Time until the token expires (zero or negative yields an
    ///   already expired token)
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry falls outside the representable time range
    pub fn for_user(user: U, ttl: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!("token lifetime out of range: {}", ttl))
        })?;

        Ok(Self {
            exp: exp.timestamp(),
            iat: now.timestamp(),
            user,
        })
    }

    /// Override expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid at the instant of its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
