//! Configuration module for the tweeteur service.
//!
//! All runtime configuration comes from environment variables, read once at
//! startup into an [`AppConfig`] that is passed explicitly to the router and
//! its components. Nothing reads the environment after boot.

use log::{info, warn};
use std::env;

/// Name of the session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "tweeteur-session";

/// Runtime configuration for the service.
///
/// # Required Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string
/// - `SECRET_KEY`: HMAC secret used to sign and verify session tokens
///
/// # Optional Environment Variables
///
/// - `PORT`: Server port (defaults to 3000)
/// - `FRONT_URL`: Frontend origin allowed by CORS; if unset, no
///   cross-origin requests are allowed
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Secret used to sign and verify session tokens.
    pub secret_key: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Frontend origin allowed to make credentialed cross-origin requests.
    pub front_url: Option<String>,
}

impl AppConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Returns
    ///
    /// - `Ok(AppConfig)`: If all required variables are present
    /// - `Err(String)`: A message naming the first missing variable
    pub fn from_env() -> Result<Self, String> {
        info!("Loading configuration from environment variables");

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is not set".to_string())?;

        let secret_key = env::var("SECRET_KEY")
            .map_err(|_| "SECRET_KEY environment variable is not set".to_string())?;
        if secret_key.len() < 16 {
            warn!(
                "SECRET_KEY is unusually short ({} characters)",
                secret_key.len()
            );
        }

        let front_url = match env::var("FRONT_URL") {
            Ok(url) if !url.is_empty() => Some(url),
            _ => {
                info!("No FRONT_URL set - cross-origin requests are disabled");
                None
            }
        };

        let port = get_server_port();

        info!("Configuration loaded successfully (port {})", port);

        Ok(AppConfig {
            database_url,
            secret_key,
            port,
            front_url,
        })
    }
}

/// Gets the server port from environment variables or returns the default.
///
/// This function reads the `PORT` environment variable and parses it as a u16.
/// If the environment variable is not set or cannot be parsed, it defaults to 3000.
///
/// # Panics
///
/// This function will panic if the `PORT` environment variable is set to a value
/// that cannot be parsed as a valid port number.
pub fn get_server_port() -> u16 {
    env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .expect("PORT must be a valid number")
}
