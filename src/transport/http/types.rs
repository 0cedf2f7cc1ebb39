use crate::app::{AccountService, CateringService, MenuService, ServiceSettings};
use crate::crypto::TokenIssuer;
use crate::domain::{MenuItem, PublicUser};
use crate::infra::mailer::Mailer;
use crate::storage::{MenuStore, UserStore};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub menu: Arc<MenuService>,
    pub catering: Arc<CateringService>,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        menu: Arc<dyn MenuStore>,
        mailer: Arc<dyn Mailer>,
        tokens: TokenIssuer,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                users.clone(),
                mailer.clone(),
                tokens.clone(),
                settings.bcrypt_cost,
            )),
            menu: Arc::new(MenuService::new(menu, users.clone())),
            catering: Arc::new(CateringService::new(mailer, settings.catering_inbox)),
            users,
            tokens,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyEmailRequest {
    pub email: String,
    /// Six-digit code; a JSON number is accepted as well as a string.
    #[schema(value_type = String)]
    pub verification_code: JsonValue,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddFavoriteRequest {
    /// Menu item id; an integer or a numeric string.
    #[schema(value_type = i32)]
    pub food_id: JsonValue,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SignupResponse {
    pub user: PublicUser,
    pub message: String,
}

/// Returned by login and email verification.
#[derive(Serialize, Debug, ToSchema)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
    pub message: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UserResponse {
    pub user: PublicUser,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct FavoritesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub favorites: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItem>>,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: format!("Invalid JSON body: {} (expected: {})", err.body_text(), expected),
        }),
    )
}
