//! Hashtag resolution, linking, and hashtag read paths.
//!
//! Names are unique case-insensitively. Resolution partitions extracted
//! tokens into already-known and brand-new tags, creates the new ones, and
//! links the whole set to the tweet - all inside the tweet's own transaction.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::AppResult;
use crate::store::{escape_like, HASHTAG_PAGE_SIZE, TRENDING_PAGE_SIZE};

/// A hashtag row as returned by the search endpoint.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Hashtag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A trending entry: hashtag plus how many tweets carry it.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrendingHashtag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub tweet_count: i64,
}

/// Resolves extracted tokens and links them all to a tweet, inside the
/// caller's transaction.
///
/// Tokens are deduplicated case-insensitively, missing tags are created
/// (`ON CONFLICT DO NOTHING` against the case-insensitive unique index, so a
/// concurrent writer creating the same tag is harmless), and every resolved
/// tag is associated with the tweet.
pub async fn link_hashtags(
    conn: &mut PgConnection,
    tweet_id: i64,
    tokens: &[String],
) -> AppResult<()> {
    let mut seen = Vec::new();
    let mut names = Vec::new();
    for token in tokens {
        let lowered = token.to_lowercase();
        if !seen.contains(&lowered) {
            seen.push(lowered);
            names.push(token.clone());
        }
    }

    if names.is_empty() {
        return Ok(());
    }

    let existing: Vec<String> = sqlx::query_scalar(
        "SELECT LOWER(name) FROM hashtags WHERE LOWER(name) = ANY($1)",
    )
    .bind(&seen)
    .fetch_all(&mut *conn)
    .await?;

    let new_names: Vec<&String> = names
        .iter()
        .filter(|name| !existing.contains(&name.to_lowercase()))
        .collect();
    debug!(
        "linking {} hashtags to tweet {} ({} new)",
        names.len(),
        tweet_id,
        new_names.len()
    );

    sqlx::query(
        r#"
        INSERT INTO hashtags (name)
        SELECT * FROM UNNEST($1::TEXT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(&names)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO tweet_hashtags (tweet_id, hashtag_id)
        SELECT $1, hashtags.id FROM hashtags WHERE LOWER(hashtags.name) = ANY($2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(tweet_id)
    .bind(&seen)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// The top hashtags by number of associated tweets. No cursor; the board is
/// a fixed-size snapshot.
pub async fn trending(pool: &PgPool) -> AppResult<Vec<TrendingHashtag>> {
    let hashtags = sqlx::query_as(
        r#"
        SELECT h.id, h.name, h.created_at,
               (SELECT COUNT(*) FROM tweet_hashtags th WHERE th.hashtag_id = h.id) AS tweet_count
        FROM hashtags h
        ORDER BY tweet_count DESC
        LIMIT $1
        "#,
    )
    .bind(TRENDING_PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    Ok(hashtags)
}

/// Case-insensitive substring search over hashtag names, newest first,
/// cursor-paginated.
pub async fn search(pool: &PgPool, term: &str, cursor: Option<i64>) -> AppResult<Vec<Hashtag>> {
    let hashtags = sqlx::query_as(
        r#"
        SELECT id, name, created_at
        FROM hashtags
        WHERE name ILIKE '%' || $1 || '%' ESCAPE '\'
          AND ($2::BIGINT IS NULL OR id < $2)
        ORDER BY created_at DESC, id DESC
        LIMIT $3
        "#,
    )
    .bind(escape_like(term))
    .bind(cursor)
    .bind(HASHTAG_PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    Ok(hashtags)
}
