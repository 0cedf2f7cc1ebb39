//! Postgres-backed store for the `users` and `menu` tables.

use crate::domain::{AccountType, MenuItem, NewUser, UserAccount};
use crate::storage::{MenuStore, StoreError, UniqueField, UserStore};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::warn;

/// Tables this service owns, checked by the preflight binary.
pub const MANAGED_TABLES: &[&str] = &["menu", "users"];

const CREATE_MENU_TABLE: &str = "CREATE TABLE IF NOT EXISTS menu (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    category TEXT NOT NULL,
    choices TEXT[],
    style TEXT[],
    photo TEXT,
    \"desc\" TEXT
)";

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    user_id SERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name TEXT NOT NULL DEFAULT '',
    joined_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    last_login TIMESTAMPTZ,
    verified BOOLEAN NOT NULL DEFAULT false,
    verification_code_hash TEXT,
    account_type TEXT NOT NULL DEFAULT 'user',
    is_profile_picture BOOLEAN NOT NULL DEFAULT false,
    favorites INTEGER[] NOT NULL DEFAULT '{}'
)";

const USER_COLUMNS: &str = "user_id, username, email, password_hash, full_name, joined_date, \
    last_login, verified, verification_code_hash, account_type, is_profile_picture, favorites";

const MENU_COLUMNS: &str = "id, title, price, category, choices, style, photo, \"desc\"";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `menu` and `users` tables if they are missing.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(CREATE_MENU_TABLE)
            .execute(&self.pool)
            .await
            .context("failed to create menu table")?;
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .context("failed to create users table")?;
        Ok(())
    }

    /// Managed tables not present in the `public` schema.
    pub async fn missing_tables(&self) -> anyhow::Result<Vec<&'static str>> {
        let present: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables WHERE table_schema = 'public'",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(MANAGED_TABLES
            .iter()
            .copied()
            .filter(|t| !present.iter().any(|p| p == t))
            .collect())
    }

    async fn fetch_user(&self, sql: &str, bind: &str) -> anyhow::Result<Option<UserAccount>> {
        let row = sqlx::query(sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }
}

fn user_from_row(row: &PgRow) -> anyhow::Result<UserAccount> {
    let account_type: String = row.try_get("account_type")?;
    let account_type = account_type.parse::<AccountType>().unwrap_or_else(|e| {
        warn!("{}; treating as regular user", e);
        AccountType::User
    });
    Ok(UserAccount {
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        joined_date: row.try_get("joined_date")?,
        last_login: row.try_get("last_login")?,
        verified: row.try_get("verified")?,
        verification_code_hash: row.try_get("verification_code_hash")?,
        account_type,
        is_profile_picture: row.try_get("is_profile_picture")?,
        favorites: row.try_get("favorites")?,
    })
}

fn menu_item_from_row(row: &PgRow) -> anyhow::Result<MenuItem> {
    Ok(MenuItem {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        choices: row.try_get("choices")?,
        style: row.try_get("style")?,
        photo: row.try_get("photo")?,
        desc: row.try_get("desc")?,
    })
}

fn favorites_from_row(row: Option<PgRow>) -> anyhow::Result<Option<Vec<i32>>> {
    row.map(|r| r.try_get::<Vec<i32>, _>("favorites"))
        .transpose()
        .map_err(Into::into)
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, user_id: i32) -> anyhow::Result<Option<UserAccount>> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserAccount>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        self.fetch_user(&sql, username).await
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserAccount>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        self.fetch_user(&sql, email).await
    }

    async fn find_unverified_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<UserAccount>> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = $1 AND verified = false",
            USER_COLUMNS
        );
        self.fetch_user(&sql, email).await
    }

    async fn insert(&self, user: NewUser) -> Result<UserAccount, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, full_name, joined_date, \
             verified, verification_code_hash, account_type, is_profile_picture) \
             VALUES ($1, $2, $3, $4, $5, false, $6, $7, false) RETURNING {}",
            USER_COLUMNS
        );
        let result = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .bind(user.joined_date)
            .bind(&user.verification_code_hash)
            .bind(AccountType::User.as_str())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(user_from_row(&row)?),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let field = match db.constraint() {
                    Some(c) if c.contains("email") => UniqueField::Email,
                    _ => UniqueField::Username,
                };
                Err(StoreError::Conflict(field))
            }
            Err(e) => Err(StoreError::Backend(
                anyhow::Error::new(e).context("failed to insert user"),
            )),
        }
    }

    async fn mark_verified(&self, user_id: i32) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET verified = true, verification_code_hash = NULL \
             WHERE user_id = $1 AND verified = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_verification_code(&self, user_id: i32, code_hash: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE users SET verification_code_hash = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(code_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_last_login(&self, user_id: i32, at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_favorite(&self, user_id: i32, item_id: i32) -> anyhow::Result<Option<Vec<i32>>> {
        // Single statement so concurrent adds cannot duplicate an id.
        let row = sqlx::query(
            "UPDATE users SET favorites = CASE \
                WHEN $2 = ANY(favorites) THEN favorites \
                ELSE array_append(favorites, $2) END \
             WHERE user_id = $1 RETURNING favorites",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        favorites_from_row(row)
    }

    async fn remove_favorite(
        &self,
        user_id: i32,
        item_id: i32,
    ) -> anyhow::Result<Option<Vec<i32>>> {
        let row = sqlx::query(
            "UPDATE users SET favorites = array_remove(favorites, $2) \
             WHERE user_id = $1 RETURNING favorites",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        favorites_from_row(row)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MenuStore for PgStore {
    async fn list_items(&self) -> anyhow::Result<Vec<MenuItem>> {
        let sql = format!("SELECT {} FROM menu ORDER BY id", MENU_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(menu_item_from_row).collect()
    }

    async fn find_items(&self, ids: &[i32]) -> anyhow::Result<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM menu WHERE id = ANY($1) ORDER BY id",
            MENU_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(menu_item_from_row).collect()
    }

    async fn item_exists(&self, id: i32) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM menu WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
