// Storage contract shared by the JSON file backend and the MongoDB backend

pub mod json;
pub mod mongo;

pub use json::JsonFileStore;
pub use mongo::MongoUserStore;

use crate::models::User;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("unexpected database response: {0}")]
    UnexpectedResponse(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Uniform CRUD operations over a backend holding `User` records.
///
/// Backends assign ids themselves: any `id` set on the `User` passed to
/// `create` or `update` is ignored, and `update` never changes the stored id.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Short label of the backend, e.g. `"json"`
    fn backend(&self) -> &'static str;

    /// All users, in no particular order
    async fn list(&self) -> StorageResult<Vec<User>>;

    async fn get(&self, id: &str) -> StorageResult<User>;

    /// Persists a new user and returns its freshly assigned id
    async fn create(&self, user: User) -> StorageResult<String>;

    /// Replaces `name` and `email` of an existing user
    async fn update(&self, id: &str, user: User) -> StorageResult<()>;

    async fn delete(&self, id: &str) -> StorageResult<()>;
}
