//! Hashtag routes: the trending board and free-text search.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::handlers::CursorQuery;
use crate::store::hashtags;

// GET /hashtags/trending
pub async fn trending(State(pool): State<PgPool>) -> AppResult<impl IntoResponse> {
    let trending = hashtags::trending(&pool).await?;
    Ok(Json(trending))
}

// GET /hashtags/search/:q?cursor=
pub async fn search(
    State(pool): State<PgPool>,
    Path(term): Path<String>,
    Query(query): Query<CursorQuery>,
) -> AppResult<impl IntoResponse> {
    let hashtags = hashtags::search(&pool, &term, query.cursor).await?;
    Ok(Json(hashtags))
}
