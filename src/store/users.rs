//! User accounts: registration, credentials, profiles, follow listings,
//! suggestions and search.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::store::{escape_like, DEFAULT_SUGGESTIONS, USER_SEARCH_PAGE_SIZE};

/// Avatar served when a user never set one.
pub const DEFAULT_AVATAR: &str = "/avatars/default.svg";

/// Checks whether a username or email is already taken.
///
/// Both clashes are collected in one pass so a request colliding on both
/// fields gets both reasons back. An empty vec means the registration can
/// proceed.
pub async fn find_conflicts(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> AppResult<Vec<String>> {
    #[derive(FromRow)]
    struct ExistingUser {
        username: String,
        email: String,
    }

    let existing: Vec<ExistingUser> =
        sqlx::query_as("SELECT username, email FROM users WHERE username = $1 OR email = $2")
            .bind(username)
            .bind(email)
            .fetch_all(pool)
            .await?;

    let mut errors = Vec::new();
    for user in existing {
        if user.email == email {
            errors.push("This email is already used".to_string());
        }
        if user.username == username {
            errors.push("This username is already used".to_string());
        }
    }

    Ok(errors)
}

/// Inserts a new user and returns its id.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    hash: &str,
) -> AppResult<i64> {
    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, hash)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(hash)
    .fetch_one(pool)
    .await?;

    Ok(user_id)
}

/// Stored credentials for a login attempt.
#[derive(Debug, FromRow)]
pub struct Credentials {
    pub id: i64,
    pub hash: String,
}

/// Looks a user up by username or email for login.
pub async fn find_credentials(
    pool: &PgPool,
    username_or_email: &str,
) -> AppResult<Option<Credentials>> {
    let credentials = sqlx::query_as(
        "SELECT id, hash FROM users WHERE username = $1 OR email = $1",
    )
    .bind(username_or_email)
    .fetch_optional(pool)
    .await?;

    Ok(credentials)
}

/// The requesting user's own profile plus the ids of everything they have
/// liked, retweeted and everyone they follow.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub id: i64,
    pub username: String,
    pub profile_name: String,
    pub email: String,
    pub url_avatar: String,
    pub bio: String,
    pub likes: Vec<i64>,
    pub retweets: Vec<i64>,
    pub following: Vec<i64>,
}

/// Fetches the `/users/me` projection, with profile defaults applied.
pub async fn get_me(pool: &PgPool, user_id: i64) -> AppResult<Option<Me>> {
    #[derive(FromRow)]
    struct UserRow {
        id: i64,
        username: String,
        email: String,
        profile_name: Option<String>,
        url_avatar: Option<String>,
        bio: Option<String>,
    }

    let user: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, email, profile_name, url_avatar, bio FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        return Ok(None);
    };

    let likes: Vec<i64> = sqlx::query_scalar("SELECT tweet_id FROM likes WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    let retweets: Vec<i64> =
        sqlx::query_scalar("SELECT tweet_id FROM retweets WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    let following: Vec<i64> =
        sqlx::query_scalar("SELECT following_id FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(Some(Me {
        id: user.id,
        profile_name: user.profile_name.unwrap_or_else(|| user.username.clone()),
        username: user.username,
        email: user.email,
        url_avatar: user.url_avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        bio: user.bio.unwrap_or_default(),
        likes,
        retweets,
        following,
    }))
}

/// A followed user, as listed by `/users/me/follows`.
#[derive(Debug, Serialize, FromRow)]
pub struct FollowedUser {
    pub id: i64,
    pub username: String,
}

/// Everyone the given user follows.
pub async fn list_follows(pool: &PgPool, user_id: i64) -> AppResult<Vec<FollowedUser>> {
    let follows = sqlx::query_as(
        r#"
        SELECT u.id, u.username
        FROM users u
        JOIN follows f ON f.following_id = u.id
        WHERE f.follower_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(follows)
}

/// A follow suggestion, ranked by follower count.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: i64,
    pub username: String,
    pub profile_name: Option<String>,
    pub url_avatar: Option<String>,
    pub follower_count: i64,
}

/// Users the requester does not follow yet (excluding themselves), most
/// followed first.
pub async fn suggestions(
    pool: &PgPool,
    user_id: i64,
    take: Option<i64>,
) -> AppResult<Vec<Suggestion>> {
    let suggestions = sqlx::query_as(
        r#"
        SELECT u.id, u.username, u.profile_name, u.url_avatar,
               (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS follower_count
        FROM users u
        WHERE u.id <> $1
          AND u.id NOT IN (SELECT following_id FROM follows WHERE follower_id = $1)
        ORDER BY follower_count DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(take.filter(|t| *t > 0).unwrap_or(DEFAULT_SUGGESTIONS))
    .fetch_all(pool)
    .await?;

    Ok(suggestions)
}

/// Case-insensitive prefix search over usernames and profile names, most
/// followed first.
pub async fn search(pool: &PgPool, term: &str) -> AppResult<Vec<Suggestion>> {
    let users = sqlx::query_as(
        r#"
        SELECT u.id, u.username, u.profile_name, u.url_avatar,
               (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS follower_count
        FROM users u
        WHERE u.username ILIKE $1 || '%' ESCAPE '\'
           OR u.profile_name ILIKE $1 || '%' ESCAPE '\'
        ORDER BY follower_count DESC
        LIMIT $2
        "#,
    )
    .bind(escape_like(term))
    .bind(USER_SEARCH_PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Activity counts shown on a public profile.
#[derive(Debug, Serialize)]
pub struct ProfileStats {
    pub followers: i64,
    pub following: i64,
    pub tweets: i64,
    pub retweets: i64,
}

/// A public profile as served by `/users/name/:username`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub username: String,
    pub profile_name: String,
    pub created_at: DateTime<Utc>,
    pub url_avatar: String,
    pub stats: ProfileStats,
}

/// Fetches a public profile by username, with defaults applied and counts of
/// followers, following, tweets and retweets.
pub async fn public_profile(pool: &PgPool, username: &str) -> AppResult<Option<PublicProfile>> {
    #[derive(FromRow)]
    struct ProfileRow {
        id: i64,
        username: String,
        profile_name: Option<String>,
        url_avatar: Option<String>,
        created_at: DateTime<Utc>,
        followers: i64,
        following: i64,
        tweets: i64,
        retweets: i64,
    }

    let row: Option<ProfileRow> = sqlx::query_as(
        r#"
        SELECT u.id, u.username, u.profile_name, u.url_avatar, u.created_at,
               (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS followers,
               (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following,
               (SELECT COUNT(*) FROM tweets t WHERE t.author_id = u.id) AS tweets,
               (SELECT COUNT(*) FROM retweets rt WHERE rt.user_id = u.id) AS retweets
        FROM users u
        WHERE u.username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| PublicProfile {
        id: row.id,
        profile_name: row.profile_name.unwrap_or_else(|| row.username.clone()),
        username: row.username,
        created_at: row.created_at,
        url_avatar: row.url_avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        stats: ProfileStats {
            followers: row.followers,
            following: row.following,
            tweets: row.tweets,
            retweets: row.retweets,
        },
    }))
}

/// The row returned after a profile update.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUser {
    pub id: i64,
    pub username: String,
    pub profile_name: Option<String>,
    pub url_avatar: Option<String>,
    pub bio: Option<String>,
}

/// Updates the profile fields that were provided, leaving the others alone.
pub async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    url_avatar: Option<&str>,
    profile_name: Option<&str>,
    bio: Option<&str>,
) -> AppResult<UpdatedUser> {
    let updated = sqlx::query_as(
        r#"
        UPDATE users
        SET url_avatar = COALESCE($2, url_avatar),
            profile_name = COALESCE($3, profile_name),
            bio = COALESCE($4, bio)
        WHERE id = $1
        RETURNING id, username, profile_name, url_avatar, bio
        "#,
    )
    .bind(user_id)
    .bind(url_avatar)
    .bind(profile_name)
    .bind(bio)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}
