//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};
use crate::pagination::Window;
use crate::query::UserQuery;
use crate::repository::UserRepository;

/// MongoDB server code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// Create a repository over the `users` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = database::mongodb::connect_from_config(&config).await?;
    /// let repo = MongoUserRepository::new(&client.database("UserCRUD"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    /// Create a repository over a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<User>(collection_name),
        }
    }

    /// Create the unique index on `email`
    ///
    /// Must run before serving traffic; it is what makes concurrent creates
    /// with the same email fail.
    pub async fn create_indexes(&self) -> UserResult<()> {
        let email_unique = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(email_unique).await?;

        tracing::info!(collection = %self.collection.name(), "User indexes created");
        Ok(())
    }

    /// `_id` equality filter; ids are stored as BSON binary subtype 4.
    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": bson::Uuid::from(id) }
    }
}

/// Whether `err` is a unique index violation
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn duplicate_or(err: mongodb::error::Error, email: &str) -> UserError {
    if is_duplicate_key(&err) {
        UserError::DuplicateEmail(email.to_string())
    } else {
        UserError::Database(err)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input, password_hash))]
    async fn create(&self, input: CreateUser, password_hash: String) -> UserResult<User> {
        let user = User::new(input, password_hash);

        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| duplicate_or(e, &user.email))?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(user)
    }

    #[instrument(skip_all)]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    #[instrument(skip(self, query))]
    async fn find(&self, query: &UserQuery, window: Window) -> UserResult<Vec<User>> {
        let options = FindOptions::builder()
            .skip(window.skip)
            .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .sort(doc! { "_id": 1 })
            .build();

        let cursor = self
            .collection
            .find(query.to_document())
            .with_options(options)
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;

        Ok(users)
    }

    #[instrument(skip(self, query))]
    async fn count(&self, query: &UserQuery) -> UserResult<u64> {
        let count = self.collection.count_documents(query.to_document()).await?;
        Ok(count)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn save(&self, user: User) -> UserResult<User> {
        let result = self
            .collection
            .replace_one(Self::id_filter(user.id), &user)
            .await
            .map_err(|e| duplicate_or(e, &user.email))?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id_and_delete(&self, id: Uuid) -> UserResult<Option<User>> {
        let removed = self
            .collection
            .find_one_and_delete(Self::id_filter(id))
            .await?;

        if removed.is_some() {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(removed)
    }
}
