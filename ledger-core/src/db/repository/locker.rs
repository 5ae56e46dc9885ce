//! Locker repository (resource registry, locker side)
//!
//! The assigned flag and the member back-reference move together in the
//! caller's transaction, keeping the bidirectional invariant: flag set iff
//! exactly one member references the locker.

use super::{member, RepoError, RepoResult};
use shared::models::Locker;
use shared::util;
use sqlx::SqliteConnection;

const LOCKER_SELECT: &str =
    "SELECT id, branch_id, label, is_assigned, member_id, created_at FROM locker";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Locker>> {
    let sql = format!("{LOCKER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Locker>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> RepoResult<Locker> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Locker {id} not found")))
}

/// The locker a member currently holds, if any.
pub async fn find_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> RepoResult<Option<Locker>> {
    let sql = format!("{LOCKER_SELECT} WHERE member_id = ?");
    let row = sqlx::query_as::<_, Locker>(&sql)
        .bind(member_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Bind a locker to a member.
///
/// Fails with `Conflict` when another member holds it. A different locker
/// previously held by the member is released first; re-reserving the same
/// locker is a no-op.
pub async fn reserve(
    conn: &mut SqliteConnection,
    locker_id: i64,
    member_id: i64,
) -> RepoResult<()> {
    let locker = get(conn, locker_id).await?;
    if locker.is_assigned {
        match locker.member_id {
            Some(holder) if holder == member_id => return Ok(()),
            _ => {
                return Err(RepoError::Conflict(format!(
                    "Locker {} is already assigned",
                    locker.label
                )));
            }
        }
    }

    // Swap: drop whatever the member held before
    release(conn, member_id).await?;

    // The partial UNIQUE index on member_id backs this write under races
    sqlx::query("UPDATE locker SET is_assigned = 1, member_id = ? WHERE id = ?")
        .bind(member_id)
        .bind(locker_id)
        .execute(&mut *conn)
        .await?;
    member::set_locker_ref(conn, member_id, Some(locker_id), util::now_millis()).await?;
    Ok(())
}

/// Release whichever locker the member holds; no-op when none.
pub async fn release(conn: &mut SqliteConnection, member_id: i64) -> RepoResult<()> {
    let held = match find_for_member(&mut *conn, member_id).await? {
        Some(locker) => locker,
        None => return Ok(()),
    };
    sqlx::query("UPDATE locker SET is_assigned = 0, member_id = NULL WHERE id = ?")
        .bind(held.id)
        .execute(&mut *conn)
        .await?;
    member::set_locker_ref(conn, member_id, None, util::now_millis()).await?;
    Ok(())
}
