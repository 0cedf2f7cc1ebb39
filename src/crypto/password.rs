//! Password hashing (bcrypt).
//!
//! bcrypt is CPU bound; the async helpers move the work onto the blocking pool so
//! request handlers never stall the runtime.

use anyhow::Context;

/// Cost used when `BCRYPT_COST` is not configured.
pub const DEFAULT_COST: u32 = 12;

pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).context("failed to hash password")
}

/// Returns `Ok(false)` for a wrong password; `Err` only when the stored hash is unusable.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).context("failed to verify password hash")
}

pub async fn hash_password_async(plain: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain, cost)).await?
}

pub async fn verify_password_async(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?
}
