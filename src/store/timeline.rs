//! Timeline query engine: every paginated read over tweets and the
//! personalized feed. Read-only; nothing here writes.
//!
//! All list endpoints share one cursor contract: the client passes the id of
//! the last row it saw, the query keeps rows with a strictly smaller id,
//! newest first, fixed page size. Ids are monotone with creation order, so
//! the id cursor and the `created_at` ordering agree. A short page tells the
//! client the stream is exhausted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::store::events::EventKind;
use crate::store::TWEET_PAGE_SIZE;

/// Compact author projection attached to every timeline entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub profile_name: Option<String>,
    pub url_avatar: Option<String>,
}

/// A tweet as every list endpoint and the single-tweet fetch project it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: i64,
    pub plain_text: String,
    pub created_at: DateTime<Utc>,
    pub original_tweet_id: Option<i64>,
    /// Username of the author of the tweet this one replies to, if a reply.
    pub original_author: Option<String>,
    pub author: UserSummary,
    pub reply_count: i64,
    pub like_count: i64,
    pub retweet_count: i64,
}

/// Flat row shape produced by the tweet projection query.
#[derive(Debug, FromRow)]
struct TweetRow {
    id: i64,
    plain_text: String,
    created_at: DateTime<Utc>,
    original_tweet_id: Option<i64>,
    original_author: Option<String>,
    author_id: i64,
    author_username: String,
    author_profile_name: Option<String>,
    author_url_avatar: Option<String>,
    reply_count: i64,
    like_count: i64,
    retweet_count: i64,
}

impl From<TweetRow> for TweetView {
    fn from(row: TweetRow) -> Self {
        TweetView {
            id: row.id,
            plain_text: row.plain_text,
            created_at: row.created_at,
            original_tweet_id: row.original_tweet_id,
            original_author: row.original_author,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
                profile_name: row.author_profile_name,
                url_avatar: row.author_url_avatar,
            },
            reply_count: row.reply_count,
            like_count: row.like_count,
            retweet_count: row.retweet_count,
        }
    }
}

/// One personalized-feed entry: a ledger event joined out to its target.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// Ledger event id; doubles as the page cursor.
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub created_at: DateTime<Utc>,
    /// The followed user whose action put this entry in the feed.
    pub author: UserSummary,
    pub target_tweet: TweetView,
}

/// Shared SELECT for the tweet projection; callers append WHERE/ORDER/LIMIT.
const TWEET_PROJECTION: &str = r#"
    SELECT t.id, t.plain_text, t.created_at, t.original_tweet_id,
           ou.username AS original_author,
           u.id AS author_id, u.username AS author_username,
           u.profile_name AS author_profile_name, u.url_avatar AS author_url_avatar,
           (SELECT COUNT(*) FROM tweets r WHERE r.original_tweet_id = t.id) AS reply_count,
           (SELECT COUNT(*) FROM likes l WHERE l.tweet_id = t.id) AS like_count,
           (SELECT COUNT(*) FROM retweets rt WHERE rt.tweet_id = t.id) AS retweet_count
    FROM tweets t
    JOIN users u ON u.id = t.author_id
    LEFT JOIN tweets ot ON ot.id = t.original_tweet_id
    LEFT JOIN users ou ON ou.id = ot.author_id
"#;

async fn fetch_page(
    pool: &PgPool,
    where_clause: &str,
    bind: Option<i64>,
    text_bind: Option<&str>,
    cursor: Option<i64>,
) -> AppResult<Vec<TweetView>> {
    let sql = format!(
        "{} WHERE {} ORDER BY t.created_at DESC, t.id DESC LIMIT {}",
        TWEET_PROJECTION, where_clause, TWEET_PAGE_SIZE
    );

    let mut query = sqlx::query_as::<_, TweetRow>(&sql);
    if let Some(value) = bind {
        query = query.bind(value);
    }
    if let Some(value) = text_bind {
        query = query.bind(value);
    }
    query = query.bind(cursor);

    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(TweetView::from).collect())
}

/// The global timeline: all tweets, newest first.
pub async fn list_tweets(pool: &PgPool, cursor: Option<i64>) -> AppResult<Vec<TweetView>> {
    fetch_page(pool, "($1::BIGINT IS NULL OR t.id < $1)", None, None, cursor).await
}

/// Replies to one tweet, newest first.
pub async fn list_replies(
    pool: &PgPool,
    tweet_id: i64,
    cursor: Option<i64>,
) -> AppResult<Vec<TweetView>> {
    fetch_page(
        pool,
        "t.original_tweet_id = $1 AND ($2::BIGINT IS NULL OR t.id < $2)",
        Some(tweet_id),
        None,
        cursor,
    )
    .await
}

/// Tweets carrying the given hashtag (matched case-insensitively).
pub async fn list_by_hashtag(
    pool: &PgPool,
    hashtag: &str,
    cursor: Option<i64>,
) -> AppResult<Vec<TweetView>> {
    fetch_page(
        pool,
        "t.id IN (SELECT th.tweet_id FROM tweet_hashtags th \
         JOIN hashtags h ON h.id = th.hashtag_id WHERE LOWER(h.name) = LOWER($1)) \
         AND ($2::BIGINT IS NULL OR t.id < $2)",
        None,
        Some(hashtag),
        cursor,
    )
    .await
}

/// Tweets by one author, newest first.
pub async fn list_by_author(
    pool: &PgPool,
    author_id: i64,
    cursor: Option<i64>,
) -> AppResult<Vec<TweetView>> {
    fetch_page(
        pool,
        "t.author_id = $1 AND ($2::BIGINT IS NULL OR t.id < $2)",
        Some(author_id),
        None,
        cursor,
    )
    .await
}

/// A single tweet by id, same projection as the lists.
pub async fn get_tweet(pool: &PgPool, tweet_id: i64) -> AppResult<Option<TweetView>> {
    let sql = format!("{} WHERE t.id = $1", TWEET_PROJECTION);

    let row: Option<TweetRow> = sqlx::query_as(&sql)
        .bind(tweet_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(TweetView::from))
}

/// Flat row shape for the personalized feed query.
#[derive(Debug, FromRow)]
struct FeedRow {
    event_id: i64,
    event_type: String,
    event_created_at: DateTime<Utc>,
    event_author_id: i64,
    event_author_username: String,
    event_author_profile_name: Option<String>,
    event_author_url_avatar: Option<String>,
    #[sqlx(flatten)]
    tweet: TweetRow,
}

/// The personalized feed: ledger events whose author the requesting user
/// follows, deduplicated by target tweet (most recent qualifying event wins),
/// newest first, joined out to the full target projection.
pub async fn my_feed(
    pool: &PgPool,
    user_id: i64,
    cursor: Option<i64>,
) -> AppResult<Vec<FeedEntry>> {
    let sql = format!(
        r#"
        SELECT e.id AS event_id, e.type AS event_type, e.created_at AS event_created_at,
               a.id AS event_author_id, a.username AS event_author_username,
               a.profile_name AS event_author_profile_name,
               a.url_avatar AS event_author_url_avatar,
               t.id, t.plain_text, t.created_at, t.original_tweet_id,
               ou.username AS original_author,
               u.id AS author_id, u.username AS author_username,
               u.profile_name AS author_profile_name, u.url_avatar AS author_url_avatar,
               (SELECT COUNT(*) FROM tweets r WHERE r.original_tweet_id = t.id) AS reply_count,
               (SELECT COUNT(*) FROM likes l WHERE l.tweet_id = t.id) AS like_count,
               (SELECT COUNT(*) FROM retweets rt WHERE rt.tweet_id = t.id) AS retweet_count
        FROM (
            SELECT DISTINCT ON (target_tweet_id) id, type, author_id, target_tweet_id, created_at
            FROM tweet_events
            WHERE ($2::BIGINT IS NULL OR id < $2)
              AND author_id IN (SELECT following_id FROM follows WHERE follower_id = $1)
            ORDER BY target_tweet_id, created_at DESC, id DESC
        ) e
        JOIN users a ON a.id = e.author_id
        JOIN tweets t ON t.id = e.target_tweet_id
        JOIN users u ON u.id = t.author_id
        LEFT JOIN tweets ot ON ot.id = t.original_tweet_id
        LEFT JOIN users ou ON ou.id = ot.author_id
        ORDER BY e.created_at DESC, e.id DESC
        LIMIT {}
        "#,
        TWEET_PAGE_SIZE
    );

    let rows: Vec<FeedRow> = sqlx::query_as(&sql)
        .bind(user_id)
        .bind(cursor)
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            let kind = EventKind::parse(&row.event_type).ok_or_else(|| {
                AppError::Internal(format!("unknown event type {:?}", row.event_type))
            })?;

            Ok(FeedEntry {
                id: row.event_id,
                kind,
                created_at: row.event_created_at,
                author: UserSummary {
                    id: row.event_author_id,
                    username: row.event_author_username,
                    profile_name: row.event_author_profile_name,
                    url_avatar: row.event_author_url_avatar,
                },
                target_tweet: TweetView::from(row.tweet),
            })
        })
        .collect()
}
