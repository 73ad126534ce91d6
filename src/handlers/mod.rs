//! HTTP route handlers.
//!
//! Handlers stay thin: authenticate via the [`AuthUser`](crate::auth::AuthUser)
//! extractor, validate the body, call into the store, shape the JSON reply.
//! Errors bubble up as [`AppError`](crate::error::AppError) and render
//! themselves.

pub mod auth;
pub mod hashtags;
pub mod tweets;
pub mod users;

use axum::response::Json;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

/// Optional pagination cursor: the id of the last row the client saw.
#[derive(Debug, Deserialize)]
pub struct CursorQuery {
    pub cursor: Option<i64>,
}

/// Handles GET requests to the root `/` endpoint.
pub async fn handle_root() -> Json<Value> {
    info!("root greeting requested");
    Json(json!("🐤 Tweeteur's API 🐤"))
}
