use crate::app::ServiceError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde_json::Value as JsonValue;

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Renders a JSON scalar as the string a client most likely meant.
pub fn scalar_to_string(v: &JsonValue) -> Option<String> {
    if let Some(s) = v.as_str() {
        return Some(s.trim().to_string());
    }
    if let Some(i) = v.as_i64() {
        return Some(i.to_string());
    }
    if let Some(u) = v.as_u64() {
        return Some(u.to_string());
    }
    None
}

/// Parses a menu item id given as an integer or a numeric string.
pub fn parse_item_id(v: &JsonValue) -> Result<i32, ServiceError> {
    let invalid = || ServiceError::bad_request("foodId must be a positive integer");
    let n = match v {
        JsonValue::Number(n) => n.as_i64().ok_or_else(invalid)?,
        JsonValue::String(s) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    if n <= 0 || n > i32::MAX as i64 {
        return Err(invalid());
    }
    Ok(n as i32)
}

/// Prefix of a token for log lines; never log the whole thing.
pub fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(12).collect();
    format!("{}...", prefix)
}
