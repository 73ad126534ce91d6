//! # Tweeteur
//!
//! A social-feed backend: users post short messages, reply, like, retweet and
//! follow each other, and read reverse-chronological timelines. The heart of
//! the service is an append-only event ledger of user actions and the
//! idempotent toggle protocol for reversible reactions; timelines (global,
//! per-user, per-hashtag, and the personalized "myfeed") are assembled from
//! live cursor-paginated queries.
//!
//! ## Configuration
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `SECRET_KEY`: HMAC secret for session tokens (required)
//! - `PORT`: Server port (defaults to 3000)
//! - `FRONT_URL`: Frontend origin allowed by CORS (optional)
//!
//! ## API Surface
//!
//! - `POST /auth/register|login|logout`: account lifecycle
//! - `GET/POST /users/..`: profiles, follow graph, suggestions, search
//! - `GET/POST /tweets/..`: posting, reactions, timelines, the personalized feed
//! - `GET /hashtags/..`: trending board and hashtag search

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};
use sqlx::PgPool;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod hashtags;
pub mod routes;
pub mod store;

// Re-export commonly used types and functions
pub use config::{get_server_port, AppConfig};
pub use error::{AppError, AppResult};
pub use hashtags::extract_hashtags;
pub use routes::build_router;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AppState {
    /// Builds the state from a database pool and the token-signing secret.
    pub fn new(pool: PgPool, secret_key: &str) -> Self {
        AppState {
            pool,
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}

impl FromRef<AppState> for EncodingKey {
    fn from_ref(state: &AppState) -> EncodingKey {
        state.encoding_key.clone()
    }
}

impl FromRef<AppState> for DecodingKey {
    fn from_ref(state: &AppState) -> DecodingKey {
        state.decoding_key.clone()
    }
}

#[cfg(test)]
mod tests;
