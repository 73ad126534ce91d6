//! Main entry point for the tweeteur web service.
//!
//! Initializes logging, loads configuration from the environment, connects to
//! PostgreSQL, applies the schema, and serves the API until terminated.

use log::{error, info};
use std::net::SocketAddr;

use tweeteur::{build_router, config::AppConfig, db, AppState};

#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            error!("{}", message);
            std::process::exit(1);
        }
    };

    let pool = match db::get_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::prepare_db(&pool).await {
        error!("Failed to prepare database schema: {}", e);
        std::process::exit(1);
    }

    let state = AppState::new(pool, &config.secret_key);
    let app = build_router(state, config.front_url.as_deref());

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Starting tweeteur server on {}", addr);

    // Bind to the address and start serving requests
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {}", e);
    }
}
