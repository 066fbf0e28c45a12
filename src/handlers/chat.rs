// POST /chat handler

use std::convert::Infallible;

use bytes::Bytes;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;
use warp::http::{HeaderMap, StatusCode};

use crate::auth::check_auth;
use crate::chat::{aggregate_reply, Context};
use crate::error::ApiError;
use crate::models::{ChatRequest, ChatResponse, ReplyOutput};
use crate::reply::ReplyError;
use crate::routes::MAX_BODY_BYTES;
use crate::state::AppState;

pub async fn chat_handler(
    state: AppState,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl warp::Reply, Infallible> {
    let request_id = Uuid::new_v4();
    let span = info_span!("chat", %request_id);

    let reply = match process_chat(&state, &headers, &body).instrument(span).await {
        Ok(response) => warp::reply::with_status(warp::reply::json(&response), StatusCode::OK),
        Err(err) => err.into_reply(),
    };
    Ok(reply)
}

/// Run one request through auth, normalization, generation and aggregation.
pub async fn process_chat(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<ChatResponse, ApiError> {
    // Declared lengths are capped by the route; this covers chunked bodies.
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(ApiError::PayloadTooLarge);
    }

    if let Err(err) = check_auth(headers, state.api_key.as_deref()) {
        warn!("rejected request with missing or invalid API key");
        return Err(err);
    }

    let request = parse_request(body)?;
    let context = Context::from_request(&request)?;

    let output = generate(state, &context).await.map_err(|err| {
        error!(session_key = %context.session_key, error = %err, "reply generation failed");
        ApiError::from(err)
    })?;

    let text = aggregate_reply(&output);
    info!(
        session_key = %context.session_key,
        provider = %context.provider,
        reply_chars = text.chars().count(),
        "chat reply sent"
    );

    Ok(ChatResponse::new(context.session_key, text))
}

/// An empty body reads as `{}`.
fn parse_request(body: &[u8]) -> Result<ChatRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ChatRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

async fn generate(state: &AppState, context: &Context) -> Result<ReplyOutput, ReplyError> {
    let pending = state.generator.generate_reply(context);
    match state.reply_timeout {
        Some(limit) => tokio::time::timeout(limit, pending)
            .await
            .map_err(|_| ReplyError::Timeout(limit))?,
        None => pending.await,
    }
}
