//! Persistence gateway for users. Only implementations of [`UserStore`] touch storage.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::{connect, PgUserStore};

use crate::error::StoreError;
use crate::model::{CreateUser, UpdateUser, User, UserFilters};
use async_trait::async_trait;
use uuid::Uuid;

/// Each call is its own implicit transaction; callers never compose them.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a row. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Exact match on email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Filtered listing, newest `created_at` first.
    async fn find_all(&self, filters: &UserFilters) -> Result<Vec<User>, StoreError>;

    /// Apply only the supplied fields and refresh `updated_at`. `None` when the id is unknown.
    async fn update(&self, id: Uuid, patch: &UpdateUser) -> Result<Option<User>, StoreError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
