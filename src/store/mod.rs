//! Store layer: every query the service runs against PostgreSQL.
//!
//! Writes go through [`tweets`] (content creation) and [`toggle`] (reversible
//! reactions), both of which maintain the event ledger in [`events`] inside
//! the same transaction as the primary record. Reads go through [`timeline`],
//! [`users`] and [`hashtags`], which never write.

pub mod events;
pub mod hashtags;
pub mod timeline;
pub mod toggle;
pub mod tweets;
pub mod users;

/// Page size shared by all tweet-shaped list endpoints.
pub const TWEET_PAGE_SIZE: i64 = 8;
/// Page size for hashtag free-text search.
pub const HASHTAG_PAGE_SIZE: i64 = 8;
/// Number of entries on the trending hashtags board.
pub const TRENDING_PAGE_SIZE: i64 = 5;
/// Page size for user search.
pub const USER_SEARCH_PAGE_SIZE: i64 = 15;
/// Default number of follow suggestions when `take` is not given.
pub const DEFAULT_SUGGESTIONS: i64 = 3;

/// Escapes `ILIKE` metacharacters (`\`, `%`, `_`) so a user-supplied search
/// term matches literally instead of acting as a pattern.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
