//! Token and credential handling.
//!
//! Sessions are signed HS256 tokens whose payload is the user id, valid for
//! 24 hours. A token travels either in the session cookie or in the
//! `x-access-token` header; the [`AuthUser`] extractor checks both before a
//! protected handler body ever runs. Passwords are hashed with argon2id.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use cookie::{time::Duration, Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SESSION_COOKIE;
use crate::error::{AppError, AppResult};

/// Token lifetime in seconds (24 hours).
const TOKEN_VALIDITY_SECS: i64 = 86_400;

/// Payload carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub id: i64,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Signs a fresh 24-hour token for the given user.
pub fn sign_token(user_id: i64, key: &EncodingKey) -> AppResult<String> {
    let claims = Claims {
        id: user_id,
        exp: Utc::now().timestamp() + TOKEN_VALIDITY_SECS,
    };

    Ok(jsonwebtoken::encode(&Header::default(), &claims, key)?)
}

/// Verifies a token and returns the user id it was signed for.
///
/// # Returns
///
/// - `Ok(i64)`: The authenticated user id
/// - `Err(AppError::Jwt)`: If the token is malformed, mis-signed, or expired
pub fn verify_token(token: &str, key: &DecodingKey) -> AppResult<i64> {
    let data = jsonwebtoken::decode::<Claims>(token, key, &Validation::default())?;
    Ok(data.claims.id)
}

/// Builds the session cookie carrying a freshly signed token.
pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(TOKEN_VALIDITY_SECS))
        .build()
}

/// Builds an expired session cookie, clearing any stored token.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Hashes a password with argon2id and a random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = password_hash::SaltString::generate(&mut rand::thread_rng());

    let hash = password_hash::PasswordHash::generate(
        argon2::Argon2::default(),
        password.as_bytes(),
        &salt,
    )
    .map_err(|err| AppError::Internal(err.to_string()))?
    .to_string();

    Ok(hash)
}

/// Checks a password against a stored argon2id hash.
///
/// Returns `true` on a match; hash-parse failures and mismatches both count
/// as a failed check so callers report a uniform credentials error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(hash) = password_hash::PasswordHash::new(stored_hash) else {
        return false;
    };

    hash.verify_password(&[&argon2::Argon2::default()], password)
        .is_ok()
}

/// The authenticated user id, extracted before a protected handler runs.
///
/// Looks for a token in the session cookie first, then in the
/// `x-access-token` header. Missing token rejects with 403, an unacceptable
/// token with 401 - the request never reaches the handler body.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    DecodingKey: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(AppError::MissingToken)?;

        let key = DecodingKey::from_ref(state);
        let user_id = verify_token(&token, &key)?;

        debug!("authenticated request for user {}", user_id);
        Ok(AuthUser(user_id))
    }
}

/// Pulls a token out of the request, preferring the session cookie over the
/// `x-access-token` header.
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(cookies) = parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
    {
        for cookie in Cookie::split_parse(cookies).flatten() {
            if cookie.name() == SESSION_COOKIE && !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }
    }

    parts
        .headers
        .get("x-access-token")
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}
