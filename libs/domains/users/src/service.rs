//! User Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, UserFilter, UserPage, UserResponse};
use crate::pagination::Pagination;
use crate::password::hash_password_blocking;
use crate::query::UserQuery;
use crate::repository::UserRepository;

/// User service providing business logic operations
///
/// Enforces email uniqueness and password hashing on writes, and shapes reads
/// into pages. Every operation returns [`UserResponse`], never the stored hash.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of all users, with totals
    #[instrument(skip(self))]
    pub async fn list_users(&self, pagination: Pagination) -> UserResult<UserPage> {
        let window = pagination.window()?;
        let query = UserQuery::All;

        let users = self.repository.find(&query, window).await?;
        let total = self.repository.count(&query).await?;

        Ok(UserPage {
            page: pagination.page,
            limit: pagination.limit,
            total_users: Some(total),
            total_pages: Some(pagination.total_pages(total)),
            users: users.into_iter().map(UserResponse::from).collect(),
        })
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    /// Free-text search; an empty term lists everyone
    #[instrument(skip(self, term))]
    pub async fn search_users(&self, term: &str, pagination: Pagination) -> UserResult<UserPage> {
        self.page(UserQuery::search(term), pagination).await
    }

    /// Per-field substring filter, all fields must match
    #[instrument(skip(self, filter))]
    pub async fn filter_users(
        &self,
        filter: UserFilter,
        pagination: Pagination,
    ) -> UserResult<UserPage> {
        self.page(UserQuery::filter(&filter), pagination).await
    }

    /// Create a new user
    #[instrument(skip_all)]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self.repository.get_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password_blocking(input.password.clone()).await?;
        let user = self.repository.create(input, password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Update an existing user
    ///
    /// Fields absent from `input` keep their stored value; `null` clears the
    /// optional profile fields.
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(ref email) = input.email {
            if email != &user.email {
                if let Some(other) = self.repository.get_by_email(email).await? {
                    if other.id != id {
                        return Err(UserError::DuplicateEmail(email.clone()));
                    }
                }
            }
        }

        let password_hash = match input.password.clone() {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        user.apply_update(input, password_hash);
        let user = self.repository.save(user).await?;

        Ok(user.into())
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        self.repository
            .find_by_id_and_delete(id)
            .await?
            .ok_or(UserError::NotFound(id))?;
        Ok(())
    }

    async fn page(&self, query: UserQuery, pagination: Pagination) -> UserResult<UserPage> {
        let window = pagination.window()?;
        let users = self.repository.find(&query, window).await?;

        Ok(UserPage {
            page: pagination.page,
            limit: pagination.limit,
            total_users: None,
            total_pages: None,
            users: users.into_iter().map(UserResponse::from).collect(),
        })
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
