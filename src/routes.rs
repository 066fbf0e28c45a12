// Route definitions and handlers

use std::convert::Infallible;

use warp::{Filter, Rejection};

use crate::error::{handle_rejection, OversizedBody};
use crate::handlers;
use crate::state::AppState;

/// Largest accepted `POST /chat` body.
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // POST /chat
    // The body is taken raw so the API key is checked before it is parsed.
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state))
        .and(warp::header::headers_cloned())
        .and(declared_length_within_limit())
        .and(warp::body::bytes())
        .and_then(handlers::chat_handler);

    health.or(chat).recover(handle_rejection)
}

// Chunked bodies carry no Content-Length; the handler checks their real size.
fn declared_length_within_limit() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|length: Option<u64>| async move {
            match length {
                Some(length) if length > MAX_BODY_BYTES => Err(warp::reject::custom(OversizedBody)),
                _ => Ok(()),
            }
        })
        .untuple_one()
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
