//! Generic idempotent toggle over reversible relations.
//!
//! Likes, retweets and follows are all the same shape: presence or absence of
//! one row keyed by (actor, target), flipped by repeated identical requests.
//! A toggle runs as a single transaction so the relation row and its paired
//! ledger event can never diverge. Unique indexes on the relation tables back
//! the at-most-one-active-row invariant.

use log::debug;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::store::events::{self, EventKind};

/// Which reversible relation a toggle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Like,
    Retweet,
    Follow,
}

impl ToggleKind {
    fn relation_table(self) -> &'static str {
        match self {
            ToggleKind::Like => "likes",
            ToggleKind::Retweet => "retweets",
            ToggleKind::Follow => "follows",
        }
    }

    fn actor_column(self) -> &'static str {
        match self {
            ToggleKind::Like | ToggleKind::Retweet => "user_id",
            ToggleKind::Follow => "follower_id",
        }
    }

    fn target_column(self) -> &'static str {
        match self {
            ToggleKind::Like | ToggleKind::Retweet => "tweet_id",
            ToggleKind::Follow => "following_id",
        }
    }

    /// The ledger event paired with this relation, if any. Follows do not
    /// feed the personalized timeline and emit no event.
    fn event_kind(self) -> Option<EventKind> {
        match self {
            ToggleKind::Like => Some(EventKind::Like),
            ToggleKind::Retweet => Some(EventKind::Retweet),
            ToggleKind::Follow => None,
        }
    }
}

/// Outcome of a toggle.
#[derive(Debug, PartialEq, Eq)]
pub enum Toggled {
    /// The relation now exists. For like/retweet, carries the id of the
    /// ledger event appended by this call (absent when a concurrent request
    /// already turned the relation on).
    On { event_id: Option<i64> },
    /// The relation (and its paired event, if any) was removed.
    Off,
}

/// Flips the relation for (actor, target).
///
/// If an active row exists it is deleted along with its paired ledger event;
/// otherwise a row is inserted and, for like/retweet, a fresh event appended.
/// Both steps happen in one transaction. Two consecutive calls with the same
/// arguments restore the original state.
pub async fn toggle(
    pool: &PgPool,
    kind: ToggleKind,
    actor_id: i64,
    target_id: i64,
) -> AppResult<Toggled> {
    let mut tx = pool.begin().await?;

    let delete_sql = format!(
        "DELETE FROM {} WHERE {} = $1 AND {} = $2 RETURNING id",
        kind.relation_table(),
        kind.actor_column(),
        kind.target_column(),
    );
    let deleted: Option<i64> = sqlx::query_scalar(&delete_sql)
        .bind(actor_id)
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;

    if deleted.is_some() {
        if let Some(event_kind) = kind.event_kind() {
            events::remove(&mut *tx, event_kind, actor_id, target_id).await?;
        }
        tx.commit().await?;

        debug!(
            "{:?} toggled off for actor {} on target {}",
            kind, actor_id, target_id
        );
        return Ok(Toggled::Off);
    }

    // ON CONFLICT covers the race where another request created the row
    // between our delete probe and this insert; in that case the other
    // request owns the paired event and we append nothing.
    let insert_sql = format!(
        "INSERT INTO {} ({}, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id",
        kind.relation_table(),
        kind.actor_column(),
        kind.target_column(),
    );
    let inserted: Option<i64> = sqlx::query_scalar(&insert_sql)
        .bind(actor_id)
        .bind(target_id)
        .fetch_optional(&mut *tx)
        .await?;

    let event_id = match (inserted, kind.event_kind()) {
        (Some(_), Some(event_kind)) => {
            Some(events::append(&mut *tx, event_kind, actor_id, target_id, None).await?)
        }
        _ => None,
    };

    tx.commit().await?;

    debug!(
        "{:?} toggled on for actor {} on target {}",
        kind, actor_id, target_id
    );
    Ok(Toggled::On { event_id })
}
