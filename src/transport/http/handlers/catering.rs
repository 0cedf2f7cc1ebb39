use crate::domain::CateringInquiry;
use crate::transport::http::types::{json_422, AppState, ErrorBody, MessageResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Accepts an event inquiry and forwards it to the catering inbox.
#[utoipa::path(
    post,
    path = "/catering/inquiries",
    request_body = CateringInquiry,
    responses(
        (status = 202, description = "Inquiry received", body = MessageResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody),
        (status = 500, description = "Failed to submit inquiry", body = ErrorBody),
        (status = 503, description = "Catering intake is not configured", body = ErrorBody)
    )
)]
pub async fn submit_inquiry_handler(
    State(state): State<AppState>,
    request: Result<Json<CateringInquiry>, JsonRejection>,
) -> Response {
    let Json(inquiry) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "catering inquiry object").into_response(),
    };

    match state.catering.submit(inquiry).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(MessageResponse::new("Inquiry received")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
