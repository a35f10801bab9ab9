pub mod memory;
pub mod postgres;

pub use memory::{MemoryMovieStore, MemoryUserStore};
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Movie, MovieCreate, MovieUpdate, NewUser, User};
use crate::pagination::Window;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    fn movie_not_found(id: i64) -> Self {
        StoreError::NotFound(format!("Movie {} not found", id))
    }
}

/// Storage abstraction over the movie collection. The memory-backed and
/// Postgres-backed implementations are interchangeable; callers are
/// handed one of them at construction time.
///
/// Insertion order is preserved by `list`; ids are assigned by the store
/// and never reused after a delete.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Full ordered collection, or the `[offset, offset+size)` slice when
    /// a window is given. A window beyond the end yields an empty vec.
    async fn list(&self, window: Option<Window>) -> Result<Vec<Movie>, StoreError>;

    async fn get(&self, id: i64) -> Result<Movie, StoreError>;

    /// Case-insensitive substring match on category, exact match on year,
    /// criteria ANDed. At least one criterion is the caller's problem.
    async fn search(
        &self,
        category: Option<&str>,
        year: Option<i32>,
    ) -> Result<Vec<Movie>, StoreError>;

    async fn insert(&self, payload: MovieCreate) -> Result<Movie, StoreError>;

    /// Apply the supplied fields of the patch, leaving the rest unchanged.
    async fn update(&self, id: i64, patch: &MovieUpdate) -> Result<Movie, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn health(&self) -> Result<(), StoreError>;
}

/// Storage abstraction for credential lookups, keyed by username.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Used by startup seeding only.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}
