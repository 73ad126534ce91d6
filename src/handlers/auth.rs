//! Registration, login and logout.
//!
//! Successful register/login sign a 24-hour token, set it as the session
//! cookie and also return it in the body for header-based clients. Every
//! request gets exactly one terminal response: a registration conflict stops
//! before any row is written.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use jsonwebtoken::EncodingKey;
use log::info;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::{Validate, ValidationError};

use crate::auth::{clear_session_cookie, hash_password, session_cookie, sign_token, verify_password};
use crate::error::{AppError, AppResult};
use crate::store::users;

fn validate_username_charset(username: &str) -> Result<(), ValidationError> {
    let Ok(re) = Regex::new(r"^[0-9A-Za-zÀ-ÖØ-öø-ÿ_-]+$") else {
        return Ok(());
    };

    if !re.is_match(username) {
        let mut error = ValidationError::new("username_charset");
        error.message = Some("Username cannot contain special characters or spaces".into());
        return Err(error);
    }

    Ok(())
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());

    if !(has_digit && has_upper && has_lower) {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Password must contain at least 1 upper case, 1 lower case and one number".into(),
        );
        return Err(error);
    }

    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterBody {
    #[validate(
        length(min = 3, max = 15, message = "Username must be between 3 and 15 characters"),
        custom = "validate_username_charset"
    )]
    username: String,
    #[validate(email(message = "E-mail must be a valid email"))]
    email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom = "validate_password_strength"
    )]
    password: String,
}

// POST /auth/register
pub async fn register(
    State(pool): State<PgPool>,
    State(key): State<EncodingKey>,
    Json(body): Json<RegisterBody>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let conflicts = users::find_conflicts(&pool, &body.username, &body.email).await?;
    if !conflicts.is_empty() {
        return Err(AppError::Conflict(conflicts));
    }

    let hash = hash_password(&body.password)?;
    let user_id = users::create_user(&pool, &body.username, &body.email, &hash).await?;
    info!("registered user {} ({})", body.username, user_id);

    let token = sign_token(user_id, &key)?;
    let cookie = session_cookie(&token);

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({
            "token": token,
            "message": "Account successfully created",
        })),
    ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[validate(length(min = 1, message = "Username or e-mail can't be blank"))]
    username_or_email: String,
    #[validate(length(min = 1, message = "Password can't be blank"))]
    password: String,
}

// POST /auth/login
pub async fn login(
    State(pool): State<PgPool>,
    State(key): State<EncodingKey>,
    Json(body): Json<LoginBody>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let credentials = users::find_credentials(&pool, &body.username_or_email).await?;

    // Unknown user and wrong password answer identically.
    let Some(credentials) = credentials else {
        return Err(AppError::InvalidCredentials);
    };
    if !verify_password(&body.password, &credentials.hash) {
        return Err(AppError::InvalidCredentials);
    }

    info!("user {} logged in", credentials.id);

    let token = sign_token(credentials.id, &key)?;
    let cookie = session_cookie(&token);

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({
            "token": token,
            "message": "You are logged in",
        })),
    ))
}

// POST /auth/logout
pub async fn logout() -> impl IntoResponse {
    let cookie = clear_session_cookie();

    (
        [(header::SET_COOKIE, cookie.to_string())],
        Json(json!({ "message": "You are logged out" })),
    )
}
