use crate::app::SignupInput;
use crate::transport::http::auth::OptionalAuthUser;
use crate::transport::http::handlers::common::{bearer_token, scalar_to_string};
use crate::transport::http::types::{
    json_422, AppState, AuthResponse, ErrorBody, LoginRequest, MessageResponse,
    ResendVerificationRequest, SignupRequest, SignupResponse, UserResponse, VerifyEmailRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created; verification code mailed", body = SignupResponse),
        (status = 400, description = "Missing username/email or password too short", body = ErrorBody),
        (status = 409, description = "Username or email already taken", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody),
        (status = 500, description = "Signup failed", body = ErrorBody)
    )
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    request: Result<Json<SignupRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, r#"{"username", "email", "password", "fullName"?}"#).into_response()
        }
    };

    let input = SignupInput {
        username: request.username,
        email: request.email,
        password: request.password,
        full_name: request.full_name,
    };
    match state.accounts.signup(input).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                user,
                message: "Check your email for verification code.".to_string(),
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Username or password missing", body = ErrorBody),
        (status = 401, description = "Unknown, unverified, or wrong password", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"username", "password"}"#).into_response(),
    };

    match state.accounts.login(&request.username, &request.password).await {
        Ok(session) => Json(AuthResponse {
            user: session.user,
            token: session.token,
            message: "Login successful".to_string(),
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified; token issued", body = AuthResponse),
        (status = 400, description = "Invalid verification code or already verified", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn verify_email_handler(
    State(state): State<AppState>,
    request: Result<Json<VerifyEmailRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"email", "verificationCode"}"#).into_response(),
    };

    let code = scalar_to_string(&request.verification_code).unwrap_or_default();
    match state.accounts.verify_email(&request.email, &code).await {
        Ok(session) => Json(AuthResponse {
            user: session.user,
            token: session.token,
            message: "Email verified successfully".to_string(),
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "New code mailed", body = MessageResponse),
        (status = 404, description = "User not found or already verified", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn resend_verification_handler(
    State(state): State<AppState>,
    request: Result<Json<ResendVerificationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"email"}"#).into_response(),
    };

    match state.accounts.resend_verification(&request.email).await {
        Ok(()) => Json(MessageResponse::new("Verification code resent.")).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Tokens are stateless; logging out is the client discarding its token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
pub async fn logout_handler(OptionalAuthUser(claims): OptionalAuthUser) -> Json<MessageResponse> {
    if let Some(claims) = claims {
        info!(user_id = claims.user_id, "user logged out");
    }
    Json(MessageResponse::new("Logged out successfully"))
}

#[utoipa::path(
    get,
    path = "/auth/user",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "No token, invalid token, or user gone", body = ErrorBody)
    ),
    security(("bearer_token" = []))
)]
pub async fn current_user_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.accounts.current_user(bearer_token(&headers)).await {
        Ok(user) => Json(UserResponse { user }).into_response(),
        Err(e) => e.into_response(),
    }
}
