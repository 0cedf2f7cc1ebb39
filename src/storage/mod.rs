//! Persistence for the `users` and `menu` tables.
//!
//! Services only see the [`UserStore`] and [`MenuStore`] traits; [`PgStore`] backs them
//! with Postgres and [`MemoryStore`] keeps everything in process (tests, local demos).

use crate::domain::{MenuItem, NewUser, UserAccount};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which unique column an insert collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate {0:?}")]
    Conflict(UniqueField),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: i32) -> anyhow::Result<Option<UserAccount>>;

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserAccount>>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserAccount>>;

    async fn find_unverified_by_email(&self, email: &str)
        -> anyhow::Result<Option<UserAccount>>;

    /// Inserts an unverified user. Username and email are unique.
    async fn insert(&self, user: NewUser) -> Result<UserAccount, StoreError>;

    /// Sets `verified` and clears the code. Returns false if the user was already verified
    /// or does not exist.
    async fn mark_verified(&self, user_id: i32) -> anyhow::Result<bool>;

    async fn set_verification_code(&self, user_id: i32, code_hash: &str) -> anyhow::Result<bool>;

    async fn touch_last_login(&self, user_id: i32, at: DateTime<Utc>) -> anyhow::Result<()>;

    /// Returns the updated favorites, or `None` if the user does not exist.
    async fn add_favorite(&self, user_id: i32, item_id: i32) -> anyhow::Result<Option<Vec<i32>>>;

    async fn remove_favorite(
        &self,
        user_id: i32,
        item_id: i32,
    ) -> anyhow::Result<Option<Vec<i32>>>;

    /// Cheap liveness probe for `/health`.
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    /// All menu rows ordered by id.
    async fn list_items(&self) -> anyhow::Result<Vec<MenuItem>>;

    /// The rows whose id is in `ids`, ordered by id. Unknown ids are skipped.
    async fn find_items(&self, ids: &[i32]) -> anyhow::Result<Vec<MenuItem>>;

    async fn item_exists(&self, id: i32) -> anyhow::Result<bool>;
}
