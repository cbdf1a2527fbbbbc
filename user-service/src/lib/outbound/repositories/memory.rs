use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local credential store.
///
/// Same contract as the Postgres repository, used for tests and local runs
/// without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    /// Map of username -> User
    users: Arc<RwLock<HashMap<String, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the active flag of a stored user.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    pub async fn deactivate(&self, username: &Username) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(username.as_str())
            .ok_or_else(|| UserError::NotFoundByUsername(username.to_string()))?;

        user.is_active = false;
        user.updated_at = Some(Utc::now());

        tracing::info!(user_id = %user.id, "User deactivated");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, username: &Username, password_hash: &str) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.contains_key(username.as_str()) {
            return Err(UserError::UsernameAlreadyExists(username.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            username: username.clone(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
            deleted_at: None,
        };

        users.insert(username.as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .get(username.as_str())
            .filter(|user| user.deleted_at.is_none())
            .cloned())
    }
}
