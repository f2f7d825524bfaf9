//! Users Domain
//!
//! A user directory over MongoDB: CRUD, free-text search and per-field
//! filtering, all paginated.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Email uniqueness, password hashing, paging
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, query builder
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, repository::InMemoryUserRepository, service::UserService};
//!
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod pagination;
pub mod password;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, router};
pub use models::{
    CreateUser, MessageResponse, UpdateUser, User, UserFilter, UserPage, UserResponse,
};
pub use mongodb::MongoUserRepository;
pub use pagination::{PageParams, Pagination, SearchParams};
pub use query::UserQuery;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
