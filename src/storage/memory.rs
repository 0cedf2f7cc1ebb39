//! In-process store with the same semantics as [`super::PgStore`].

use crate::domain::menu::{add_favorite, remove_favorite};
use crate::domain::{AccountType, MenuItem, NewUser, UserAccount};
use crate::storage::{MenuStore, StoreError, UniqueField, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use anyhow::anyhow;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    users: BTreeMap<i32, UserAccount>,
    last_user_id: i32,
    menu: BTreeMap<i32, MenuItem>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_menu(items: Vec<MenuItem>) -> Self {
        let menu = items.into_iter().map(|item| (item.id, item)).collect();
        Self {
            inner: Arc::new(RwLock::new(Inner {
                menu,
                ..Inner::default()
            })),
            unavailable: Arc::default(),
        }
    }

    /// A store pre-filled with the house menu used by the frontend mock-ups.
    pub fn with_sample_menu() -> Self {
        Self::with_menu(sample_menu())
    }

    /// While set, `ping` fails as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    async fn find_user<F>(&self, predicate: F) -> Option<UserAccount>
    where
        F: Fn(&UserAccount) -> bool,
    {
        let inner = self.inner.read().await;
        inner.users.values().find(|u| predicate(*u)).cloned()
    }
}

pub fn sample_menu() -> Vec<MenuItem> {
    let item = |id: i32, title: &str, price: f64, category: &str| MenuItem {
        id,
        title: title.to_string(),
        price,
        category: category.to_string(),
        choices: None,
        style: None,
        photo: None,
        desc: None,
    };

    vec![
        MenuItem {
            photo: Some("menu-1".to_string()),
            choices: Some(vec!["Asada".into(), "Pollo".into(), "Carnitas".into()]),
            ..item(1, "Deluxe Burrito", 9.5, "Burritos")
        },
        MenuItem {
            photo: Some("menu-2".to_string()),
            style: Some(vec!["Cilantro".into(), "Onion".into()]),
            ..item(2, "Asada Tacos", 3.0, "Tacos/Tortas")
        },
        MenuItem {
            photo: Some("menu-3".to_string()),
            ..item(3, "Shrimp Cocktail", 7.0, "Individual")
        },
        MenuItem {
            desc: Some("Feeds 4-6 guests".to_string()),
            ..item(4, "Party Platter", 45.0, "Combinations")
        },
        item(5, "Horchata", 2.5, "Drinks/Bebidas"),
    ]
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, user_id: i32) -> anyhow::Result<Option<UserAccount>> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserAccount>> {
        Ok(self.find_user(|u| u.username == username).await)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserAccount>> {
        Ok(self.find_user(|u| u.email == email).await)
    }

    async fn find_unverified_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<UserAccount>> {
        Ok(self.find_user(|u| u.email == email && !u.verified).await)
    }

    async fn insert(&self, user: NewUser) -> Result<UserAccount, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }

        inner.last_user_id += 1;
        let account = UserAccount {
            user_id: inner.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            joined_date: user.joined_date,
            last_login: None,
            verified: false,
            verification_code_hash: Some(user.verification_code_hash),
            account_type: AccountType::User,
            is_profile_picture: false,
            favorites: Vec::new(),
        };
        inner.users.insert(account.user_id, account.clone());
        Ok(account)
    }

    async fn mark_verified(&self, user_id: i32) -> anyhow::Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(u) if !u.verified => {
                u.verified = true;
                u.verification_code_hash = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_verification_code(&self, user_id: i32, code_hash: &str) -> anyhow::Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(match inner.users.get_mut(&user_id) {
            Some(u) => {
                u.verification_code_hash = Some(code_hash.to_string());
                true
            }
            None => false,
        })
    }

    async fn touch_last_login(&self, user_id: i32, at: DateTime<Utc>) -> anyhow::Result<()> {
        if let Some(u) = self.inner.write().await.users.get_mut(&user_id) {
            u.last_login = Some(at);
        }
        Ok(())
    }

    async fn add_favorite(&self, user_id: i32, item_id: i32) -> anyhow::Result<Option<Vec<i32>>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|u| {
            add_favorite(&mut u.favorites, item_id);
            u.favorites.clone()
        }))
    }

    async fn remove_favorite(
        &self,
        user_id: i32,
        item_id: i32,
    ) -> anyhow::Result<Option<Vec<i32>>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|u| {
            remove_favorite(&mut u.favorites, item_id);
            u.favorites.clone()
        }))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("connection refused by 10.0.0.5:5432"));
        }
        Ok(())
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn list_items(&self) -> anyhow::Result<Vec<MenuItem>> {
        Ok(self.inner.read().await.menu.values().cloned().collect())
    }

    async fn find_items(&self, ids: &[i32]) -> anyhow::Result<Vec<MenuItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .menu
            .values()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }

    async fn item_exists(&self, id: i32) -> anyhow::Result<bool> {
        Ok(self.inner.read().await.menu.contains_key(&id))
    }
}
