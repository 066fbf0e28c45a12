// HTTP server modules
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod state;

// Request normalization and reply aggregation
pub mod chat;

// Reply generators
pub mod reply;
