//! Tweet routes: posting, replying, reactions and every tweet-shaped read.

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
use crate::handlers::CursorQuery;
use crate::store::timeline;
use crate::store::toggle::{toggle, ToggleKind, Toggled};
use crate::store::tweets::create_tweet;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TweetBody {
    #[validate(length(min = 1, message = "Message can't be blank"))]
    plain_text: String,
}

// POST /tweets
pub async fn create(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<TweetBody>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let new_tweet = create_tweet(&pool, user_id, &body.plain_text, None).await?;

    Ok(Json(json!({
        "message": "Tweet posted",
        "tweetId": new_tweet.tweet_id,
        "tweetEventId": new_tweet.event_id,
    })))
}

// POST /tweets/:id/reply
pub async fn reply(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Path(tweet_id): Path<i64>,
    Json(body): Json<TweetBody>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let new_tweet = create_tweet(&pool, user_id, &body.plain_text, Some(tweet_id)).await?;

    Ok(Json(json!({
        "message": "Reply posted",
        "tweetId": new_tweet.tweet_id,
        "tweetEventId": new_tweet.event_id,
    })))
}

// POST /tweets/:id/like
pub async fn like(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Path(tweet_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let response = match toggle(&pool, ToggleKind::Like, user_id, tweet_id).await? {
        Toggled::On { event_id } => json!({
            "message": "Tweet liked",
            "tweetEventId": event_id,
        }),
        Toggled::Off => json!({ "message": "Tweet unliked" }),
    };

    Ok(Json(response))
}

// POST /tweets/:id/retweet
pub async fn retweet(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Path(tweet_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let response = match toggle(&pool, ToggleKind::Retweet, user_id, tweet_id).await? {
        Toggled::On { event_id } => json!({
            "message": "Tweet retweeted",
            "tweetEventId": event_id,
        }),
        Toggled::Off => json!({ "message": "Tweet not retweeted anymore" }),
    };

    Ok(Json(response))
}

// GET /tweets?cursor=
pub async fn list(
    State(pool): State<PgPool>,
    Query(query): Query<CursorQuery>,
) -> AppResult<impl IntoResponse> {
    let tweets = timeline::list_tweets(&pool, query.cursor).await?;
    Ok(Json(tweets))
}

// GET /tweets/myfeed?cursor=
pub async fn my_feed(
    State(pool): State<PgPool>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<CursorQuery>,
) -> AppResult<impl IntoResponse> {
    let feed = timeline::my_feed(&pool, user_id, query.cursor).await?;
    Ok(Json(feed))
}

// GET /tweets/:id
pub async fn single(
    State(pool): State<PgPool>,
    Path(tweet_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let tweet = timeline::get_tweet(&pool, tweet_id)
        .await?
        .ok_or(AppError::NotFound("Tweet not found"))?;

    Ok(Json(tweet))
}

// GET /tweets/:id/replies?cursor=
pub async fn replies(
    State(pool): State<PgPool>,
    Path(tweet_id): Path<i64>,
    Query(query): Query<CursorQuery>,
) -> AppResult<impl IntoResponse> {
    let replies = timeline::list_replies(&pool, tweet_id, query.cursor).await?;
    Ok(Json(replies))
}

// GET /tweets/hashtag/:tag?cursor=
pub async fn by_hashtag(
    State(pool): State<PgPool>,
    Path(hashtag): Path<String>,
    Query(query): Query<CursorQuery>,
) -> AppResult<impl IntoResponse> {
    let tweets = timeline::list_by_hashtag(&pool, &hashtag, query.cursor).await?;
    Ok(Json(tweets))
}

// GET /tweets/user/:id?cursor=
pub async fn by_author(
    State(pool): State<PgPool>,
    Path(author_id): Path<i64>,
    Query(query): Query<CursorQuery>,
) -> AppResult<impl IntoResponse> {
    let tweets = timeline::list_by_author(&pool, author_id, query.cursor).await?;
    Ok(Json(tweets))
}
