//! The append-only event ledger.
//!
//! Every user action that can surface in a personalized feed is recorded as a
//! `tweet_events` row: posting, replying, liking, retweeting. Rows are never
//! updated; the only deletion is a like/retweet toggling off, which removes
//! its paired event. Follows are not recorded here - the feed carries content
//! and reactions, not graph changes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;

/// The kind of action a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A new top-level tweet; target is the tweet itself.
    Tweet,
    /// A new reply; target is the reply itself.
    Reply,
    /// A like; target is the liked tweet.
    Like,
    /// A retweet; target is the retweeted tweet.
    Retweet,
}

impl EventKind {
    /// Wire/storage name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Tweet => "tweet",
            EventKind::Reply => "reply",
            EventKind::Like => "like",
            EventKind::Retweet => "retweet",
        }
    }

    /// Parses a stored kind name back to the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tweet" => Some(EventKind::Tweet),
            "reply" => Some(EventKind::Reply),
            "like" => Some(EventKind::Like),
            "retweet" => Some(EventKind::Retweet),
            _ => None,
        }
    }
}

/// Appends a ledger entry inside the caller's transaction.
///
/// For tweet/reply events the caller passes the tweet's own `created_at` so
/// that ordering by either field agrees; like/retweet events are stamped by
/// the database.
///
/// # Returns
///
/// The id of the new event row.
pub async fn append(
    conn: &mut PgConnection,
    kind: EventKind,
    author_id: i64,
    target_tweet_id: i64,
    created_at: Option<DateTime<Utc>>,
) -> Result<i64, sqlx::Error> {
    let event_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO tweet_events (type, author_id, target_tweet_id, created_at)
        VALUES ($1, $2, $3, COALESCE($4, NOW()))
        RETURNING id
        "#,
    )
    .bind(kind.as_str())
    .bind(author_id)
    .bind(target_tweet_id)
    .bind(created_at)
    .fetch_one(conn)
    .await?;

    Ok(event_id)
}

/// Deletes the ledger entries paired with a toggled-off reaction, inside the
/// caller's transaction.
pub async fn remove(
    conn: &mut PgConnection,
    kind: EventKind,
    author_id: i64,
    target_tweet_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM tweet_events
        WHERE type = $1 AND author_id = $2 AND target_tweet_id = $3
        "#,
    )
    .bind(kind.as_str())
    .bind(author_id)
    .bind(target_tweet_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
