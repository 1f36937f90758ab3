use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Post, Profile, ProfileView, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors from a persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value for unique field '{0}'")]
    Duplicate(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Document persistence for users, profiles and posts.
///
/// Writes are single-attempt and unguarded: a load-modify-save sequence
/// spanning several calls is last-write-wins.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a new user. `Duplicate("email")` if the address is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Returns whether a user was removed
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn find_profile(&self, user: Uuid) -> Result<Option<Profile>, StoreError>;
    /// Profile for `user` with the owner's name and avatar joined in
    async fn find_profile_view(&self, user: Uuid) -> Result<Option<ProfileView>, StoreError>;
    async fn list_profile_views(&self) -> Result<Vec<ProfileView>, StoreError>;
    /// Insert or replace the profile keyed by its owner
    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn delete_profile(&self, user: Uuid) -> Result<bool, StoreError>;

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Returns the number of posts removed
    async fn delete_posts_by_user(&self, user: Uuid) -> Result<u64, StoreError>;
}
