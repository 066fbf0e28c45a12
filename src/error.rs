//! Handler-boundary errors and their HTTP mapping

use std::convert::Infallible;

use thiserror::Error;
use tracing::{debug, error};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Rejection;

use crate::chat::ContextError;
use crate::models::ErrorResponse;
use crate::reply::ReplyError;

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Every way a request can fail once it reaches the API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    /// Reply generator failure; the message is forwarded as is
    #[error(transparent)]
    Reply(#[from] ReplyError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Context(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Reply(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render as `{ "ok": false, "error": ... }` with the matching status.
    pub fn into_reply(self) -> WithStatus<Json> {
        let status = self.status();
        warp::reply::with_status(
            warp::reply::json(&ErrorResponse::new(self.to_string())),
            status,
        )
    }
}

/// Raised by the route filter when a declared Content-Length exceeds the cap
#[derive(Debug)]
pub struct OversizedBody;

impl warp::reject::Reject for OversizedBody {}

/// Map warp rejections onto the JSON error shape.
pub async fn handle_rejection(err: Rejection) -> Result<WithStatus<Json>, Infallible> {
    let api_error = classify_rejection(&err);
    debug!(status = %api_error.status(), "request rejected");
    Ok(api_error.into_reply())
}

fn classify_rejection(err: &Rejection) -> ApiError {
    if err.is_not_found() {
        ApiError::NotFound
    } else if err.find::<OversizedBody>().is_some()
        || err.find::<warp::reject::PayloadTooLarge>().is_some()
    {
        ApiError::PayloadTooLarge
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ApiError::MethodNotAllowed
    } else {
        error!(rejection = ?err, "unhandled rejection");
        ApiError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
    }
}
