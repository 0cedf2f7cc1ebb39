//! Menu items and the per-user favorites list.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Vec<String>>,
    /// Image key resolved by the frontend (e.g. `menu-1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// Appends `item_id` unless already present. Returns whether the list changed.
pub fn add_favorite(favorites: &mut Vec<i32>, item_id: i32) -> bool {
    if favorites.contains(&item_id) {
        return false;
    }
    favorites.push(item_id);
    true
}

/// Removes every occurrence of `item_id`. Returns whether the list changed.
pub fn remove_favorite(favorites: &mut Vec<i32>, item_id: i32) -> bool {
    let before = favorites.len();
    favorites.retain(|id| *id != item_id);
    favorites.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_keeps_order() {
        let mut favs = vec![];
        assert!(add_favorite(&mut favs, 3));
        assert!(add_favorite(&mut favs, 1));
        assert!(!add_favorite(&mut favs, 3));
        assert_eq!(favs, vec![3, 1]);
    }

    #[test]
    fn remove_reports_change() {
        let mut favs = vec![3, 1, 3];
        assert!(remove_favorite(&mut favs, 3));
        assert_eq!(favs, vec![1]);
        assert!(!remove_favorite(&mut favs, 9));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let item = MenuItem {
            id: 5,
            title: "Horchata".into(),
            price: 2.5,
            category: "Drinks/Bebidas".into(),
            choices: None,
            style: None,
            photo: None,
            desc: None,
        };
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"id": 5, "title": "Horchata", "price": 2.5, "category": "Drinks/Bebidas"})
        );
    }
}
