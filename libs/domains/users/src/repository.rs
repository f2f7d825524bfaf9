use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};
use crate::pagination::Window;
use crate::query::UserQuery;

/// Repository trait for User persistence
///
/// Listing order is ascending id. Ids are UUIDv7, so that is insertion order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; the repository assigns the id
    async fn create(&self, input: CreateUser, password_hash: String) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by exact email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Users matching `query`, restricted to `window`
    async fn find(&self, query: &UserQuery, window: Window) -> UserResult<Vec<User>>;

    /// Number of users matching `query`
    async fn count(&self, query: &UserQuery) -> UserResult<u64>;

    /// Replace a stored user with `user`
    async fn save(&self, user: User) -> UserResult<User>;

    /// Remove a user, returning it if it existed
    async fn find_by_id_and_delete(&self, id: Uuid) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Enforces email uniqueness the way the MongoDB unique index does.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser, password_hash: String) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == input.email) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User::new(input, password_hash);
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find(&self, query: &UserQuery, window: Window) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| query.matches(u))
            .cloned()
            .collect();
        result.sort_by_key(|u| u.id);

        let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(result.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self, query: &UserQuery) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| query.matches(u)).count() as u64)
    }

    async fn save(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn find_by_id_and_delete(&self, id: Uuid) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        let removed = users.remove(&id);

        if removed.is_some() {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(removed)
    }
}
