//! Menu listing and the per-user favorites list.

use crate::app::error::ServiceError;
use crate::domain::MenuItem;
use crate::storage::{MenuStore, UserStore};
use std::sync::Arc;
use tracing::info;

pub struct MenuService {
    menu: Arc<dyn MenuStore>,
    users: Arc<dyn UserStore>,
}

impl MenuService {
    pub fn new(menu: Arc<dyn MenuStore>, users: Arc<dyn UserStore>) -> Self {
        Self { menu, users }
    }

    pub async fn list_items(&self) -> Result<Vec<MenuItem>, ServiceError> {
        self.menu
            .list_items()
            .await
            .map_err(|e| ServiceError::failed("Failed to fetch menu items", e))
    }

    pub async fn add_favorite(&self, user_id: i32, item_id: i32) -> Result<Vec<i32>, ServiceError> {
        ensure_positive(item_id)?;
        if !self.menu.item_exists(item_id).await? {
            return Err(ServiceError::not_found("Menu item not found"));
        }
        let favorites = self
            .users
            .add_favorite(user_id, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;
        info!(user_id, item_id, "favorite added");
        Ok(favorites)
    }

    /// Removing an id that is not in the list is not an error.
    pub async fn remove_favorite(
        &self,
        user_id: i32,
        item_id: i32,
    ) -> Result<Vec<i32>, ServiceError> {
        ensure_positive(item_id)?;
        let favorites = self
            .users
            .remove_favorite(user_id, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;
        info!(user_id, item_id, "favorite removed");
        Ok(favorites)
    }

    /// The user's favorite ids (in the order they were added) and the matching menu rows.
    pub async fn favorites(&self, user_id: i32) -> Result<(Vec<i32>, Vec<MenuItem>), ServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;
        let items = self.menu.find_items(&user.favorites).await?;
        Ok((user.favorites, items))
    }
}

fn ensure_positive(item_id: i32) -> Result<(), ServiceError> {
    if item_id <= 0 {
        return Err(ServiceError::bad_request("foodId must be a positive integer"));
    }
    Ok(())
}
