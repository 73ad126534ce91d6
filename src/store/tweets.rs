//! Content store: tweet and reply creation.
//!
//! Creation is one transaction covering the tweet row, its hashtag links and
//! the ledger event, so a tweet can never exist without its event (or the
//! other way round). The event reuses the tweet's `created_at` so ordering by
//! either field agrees.

use log::info;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::hashtags::extract_hashtags;
use crate::store::events::{self, EventKind};
use crate::store::hashtags::link_hashtags;

/// Ids produced by a successful creation.
#[derive(Debug)]
pub struct NewTweet {
    pub tweet_id: i64,
    pub event_id: i64,
}

/// Creates a tweet, or a reply when `original_tweet_id` is given.
///
/// Extracts hashtags from the text, resolves and links them, persists the
/// tweet row and appends the matching `tweet`/`reply` ledger event - all in
/// one transaction.
///
/// # Returns
///
/// - `Ok(NewTweet)`: The new tweet id and its ledger event id
/// - `Err(AppError::NotFound)`: When replying to a tweet that does not exist
pub async fn create_tweet(
    pool: &PgPool,
    author_id: i64,
    plain_text: &str,
    original_tweet_id: Option<i64>,
) -> AppResult<NewTweet> {
    let mut tx = pool.begin().await?;

    if let Some(parent_id) = original_tweet_id {
        let parent_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM tweets WHERE id = $1")
            .bind(parent_id)
            .fetch_optional(&mut *tx)
            .await?;
        if parent_exists.is_none() {
            return Err(AppError::NotFound("Tweet not found"));
        }
    }

    let (tweet_id, created_at): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        r#"
        INSERT INTO tweets (author_id, plain_text, original_tweet_id)
        VALUES ($1, $2, $3)
        RETURNING id, created_at
        "#,
    )
    .bind(author_id)
    .bind(plain_text)
    .bind(original_tweet_id)
    .fetch_one(&mut *tx)
    .await?;

    let tokens = extract_hashtags(plain_text);
    if !tokens.is_empty() {
        link_hashtags(&mut *tx, tweet_id, &tokens).await?;
    }

    let kind = if original_tweet_id.is_some() {
        EventKind::Reply
    } else {
        EventKind::Tweet
    };
    let event_id = events::append(&mut *tx, kind, author_id, tweet_id, Some(created_at)).await?;

    tx.commit().await?;

    info!(
        "user {} posted {} {} (event {})",
        author_id,
        kind.as_str(),
        tweet_id,
        event_id
    );

    Ok(NewTweet { tweet_id, event_id })
}
