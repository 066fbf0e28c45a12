//! Shared-secret check for the chat endpoint

use warp::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Pull the caller's secret from `x-api-key`, falling back to
/// `Authorization`. A leading `Bearer` scheme (any case) is stripped; a
/// header without one is taken verbatim.
pub fn presented_token(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(key) = header(API_KEY_HEADER) {
        return Some(key.to_string());
    }

    let token = strip_bearer(header(AUTHORIZATION.as_str())?).trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Verify the request against the configured secret. With no secret
/// configured every request passes.
pub fn check_auth(headers: &HeaderMap, api_key: Option<&str>) -> Result<(), ApiError> {
    let Some(expected) = api_key.filter(|k| !k.is_empty()) else {
        return Ok(());
    };

    match presented_token(headers) {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

fn strip_bearer(value: &str) -> &str {
    const SCHEME: &str = "bearer";
    match value.get(..SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => {
            let rest = &value[SCHEME.len()..];
            if rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                value
            }
        }
        _ => value,
    }
}
