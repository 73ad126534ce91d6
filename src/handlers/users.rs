//! User routes: own profile, follow graph, suggestions, search and the
//! follow toggle.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::store::toggle::{toggle, ToggleKind, Toggled};
use crate::store::users;

// GET /users/me
pub async fn me(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
) -> AppResult<impl IntoResponse> {
    let me = users::get_me(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    Ok(Json(me))
}

// GET /users/me/follows
pub async fn my_follows(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
) -> AppResult<impl IntoResponse> {
    let follows = users::list_follows(&pool, user_id).await?;
    Ok(Json(json!({ "follows": follows })))
}

#[derive(Debug, Deserialize)]
pub struct TakeQuery {
    take: Option<i64>,
}

// GET /users/suggestions?take=N
pub async fn suggestions(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<TakeQuery>,
) -> AppResult<impl IntoResponse> {
    let suggestions = users::suggestions(&pool, user_id, query.take).await?;
    Ok(Json(suggestions))
}

// GET /users/search/:search
pub async fn search(
    State(pool): State<PgPool>,
    Path(term): Path<String>,
) -> AppResult<impl IntoResponse> {
    let users = users::search(&pool, &term).await?;
    Ok(Json(users))
}

// GET /users/name/:username
pub async fn by_name(
    State(pool): State<PgPool>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile = users::public_profile(&pool, &username)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    Ok(Json(profile))
}

// POST /users/:id/follow
pub async fn follow(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Path(followed_user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if followed_user_id == user_id {
        return Err(AppError::BadRequest("You cannot follow yourself"));
    }

    let response = match toggle(&pool, ToggleKind::Follow, user_id, followed_user_id).await? {
        Toggled::On { .. } => json!({ "message": "User followed" }),
        Toggled::Off => json!({ "message": "User unfollowed" }),
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    url_avatar: Option<String>,
    #[validate(length(max = 30, message = "Profile name can't exceed 30 characters"))]
    profile_name: Option<String>,
    #[validate(length(max = 160, message = "Bio can't exceed 160 characters"))]
    bio: Option<String>,
}

// POST /users/me
pub async fn update_me(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateProfileBody>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let updated_user = users::update_profile(
        &pool,
        user_id,
        body.url_avatar.as_deref(),
        body.profile_name.as_deref(),
        body.bio.as_deref(),
    )
    .await?;

    Ok(Json(json!({
        "message": "User successfully updated",
        "updatedUser": updated_user,
    })))
}
