use crate::domain::MenuItem;
use crate::transport::http::auth::AuthUser;
use crate::transport::http::handlers::common::parse_item_id;
use crate::transport::http::types::{
    json_422, AddFavoriteRequest, AppState, ErrorBody, FavoritesResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    get,
    path = "/menu/items",
    responses(
        (status = 200, description = "Every menu item", body = [MenuItem]),
        (status = 500, description = "Failed to fetch menu items", body = ErrorBody)
    )
)]
pub async fn list_items_handler(State(state): State<AppState>) -> Response {
    match state.menu.list_items().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/menu/favorites",
    responses(
        (status = 200, description = "Favorite ids and the matching menu items", body = FavoritesResponse),
        (status = 401, description = "Access token required", body = ErrorBody),
        (status = 403, description = "Invalid or expired token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_token" = []))
)]
pub async fn list_favorites_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Response {
    match state.menu.favorites(claims.user_id).await {
        Ok((favorites, items)) => Json(FavoritesResponse {
            message: None,
            favorites,
            items: Some(items),
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/menu/favorites/add",
    request_body = AddFavoriteRequest,
    responses(
        (status = 200, description = "Item is in the favorites list", body = FavoritesResponse),
        (status = 400, description = "foodId missing or not a positive integer", body = ErrorBody),
        (status = 401, description = "Access token required", body = ErrorBody),
        (status = 403, description = "Invalid or expired token", body = ErrorBody),
        (status = 404, description = "Menu item or user not found", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    ),
    security(("bearer_token" = []))
)]
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    request: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"foodId"}"#).into_response(),
    };

    let item_id = match parse_item_id(&request.food_id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.menu.add_favorite(claims.user_id, item_id).await {
        Ok(favorites) => Json(FavoritesResponse {
            message: Some("Added to favorites".to_string()),
            favorites,
            items: None,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/menu/favorites/{foodId}",
    params(
        ("foodId" = i32, Path, description = "Menu item id to remove")
    ),
    responses(
        (status = 200, description = "Item is no longer in the favorites list", body = FavoritesResponse),
        (status = 400, description = "foodId is not a positive integer", body = ErrorBody),
        (status = 401, description = "Access token required", body = ErrorBody),
        (status = 403, description = "Invalid or expired token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_token" = []))
)]
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(food_id): Path<String>,
) -> Response {
    let item_id = match parse_item_id(&JsonValue::String(food_id)) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.menu.remove_favorite(claims.user_id, item_id).await {
        Ok(favorites) => Json(FavoritesResponse {
            message: Some("Removed from favorites".to_string()),
            favorites,
            items: None,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
