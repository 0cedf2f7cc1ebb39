use crate::domain::{AccountType, CateringInquiry, MenuItem, PublicUser};
use crate::transport::http::handlers::{auth, catering, health, menu};
use crate::transport::http::types::{
    AddFavoriteRequest, AppState, AuthResponse, ErrorBody, FavoritesResponse, HealthResponse,
    LoginRequest, MessageResponse, ResendVerificationRequest, SignupRequest, SignupResponse,
    UserResponse, VerifyEmailRequest,
};
use axum::http::header::{
    ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, ORIGIN,
};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root_handler,
        health::healthcheck_handler,
        menu::list_items_handler,
        menu::list_favorites_handler,
        menu::add_favorite_handler,
        menu::remove_favorite_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::verify_email_handler,
        auth::resend_verification_handler,
        auth::logout_handler,
        auth::current_user_handler,
        catering::submit_inquiry_handler
    ),
    components(schemas(
        AccountType,
        PublicUser,
        MenuItem,
        CateringInquiry,
        ErrorBody,
        MessageResponse,
        HealthResponse,
        SignupRequest,
        LoginRequest,
        VerifyEmailRequest,
        ResendVerificationRequest,
        AddFavoriteRequest,
        SignupResponse,
        AuthResponse,
        UserResponse,
        FavoritesResponse
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Routes only; no CORS, headers, or docs. Tests drive this directly.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/menu/items", get(menu::list_items_handler))
        .route("/menu/favorites", get(menu::list_favorites_handler))
        .route("/menu/favorites/add", post(menu::add_favorite_handler))
        .route("/menu/favorites/:food_id", delete(menu::remove_favorite_handler))
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/verify-email", post(auth::verify_email_handler))
        .route(
            "/auth/resend-verification",
            post(auth::resend_verification_handler),
        )
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/user", get(auth::current_user_handler))
        .route("/catering/inquiries", post(catering::submit_inquiry_handler))
        .with_state(app_state)
}

/// The full application: routes, Swagger UI, CORS for the frontend origins, no-store
/// caching, and request tracing.
pub fn create_app(app_state: AppState, frontend_origins: &[String]) -> Router {
    create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(frontend_origins))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        ))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = frontend_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            // tower-http rejects `*` inside an origin list.
            Ok(_) if o.contains('*') => {
                warn!(origin = %o, "ignoring wildcard CORS origin");
                None
            }
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
            CACHE_CONTROL,
        ])
}
