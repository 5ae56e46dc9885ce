//! Seat-assignment repository (resource registry, seat+shift side)
//!
//! Exclusivity is enforced by the UNIQUE(seat_id, shift_id) index; the
//! insert is the arbiter, never a pre-check.

use super::{RepoError, RepoResult};
use shared::models::SeatAssignment;
use shared::util;
use sqlx::SqliteConnection;

/// Reserve a (seat, shift) pair for a member.
///
/// Fails with `Conflict` when another member holds the pair; a reservation
/// the member already holds is kept as-is.
pub async fn reserve(
    conn: &mut SqliteConnection,
    member_id: i64,
    seat_id: i64,
    shift_id: i64,
) -> RepoResult<()> {
    let result = sqlx::query(
        "INSERT INTO seat_assignment (id, member_id, seat_id, shift_id, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(util::snowflake_id())
    .bind(member_id)
    .bind(seat_id)
    .bind(shift_id)
    .bind(util::now_millis())
    .execute(&mut *conn)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            let repo_err = RepoError::from(err);
            if let RepoError::Conflict(_) = repo_err {
                // Holding the pair already is not contention
                if holder(conn, seat_id, shift_id).await? == Some(member_id) {
                    return Ok(());
                }
                return Err(RepoError::Conflict(format!(
                    "Seat {seat_id} is already assigned for shift {shift_id}"
                )));
            }
            Err(repo_err)
        }
    }
}

/// Which member holds the (seat, shift) pair, if any.
pub async fn holder(
    conn: &mut SqliteConnection,
    seat_id: i64,
    shift_id: i64,
) -> RepoResult<Option<i64>> {
    let row: Option<i64> = sqlx::query_scalar(
        "SELECT member_id FROM seat_assignment WHERE seat_id = ? AND shift_id = ?",
    )
    .bind(seat_id)
    .bind(shift_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Delete every assignment held by the member. Returns the count removed.
pub async fn release_all(conn: &mut SqliteConnection, member_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM seat_assignment WHERE member_id = ?")
        .bind(member_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn list_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> RepoResult<Vec<SeatAssignment>> {
    let rows = sqlx::query_as::<_, SeatAssignment>(
        "SELECT id, member_id, seat_id, shift_id, created_at FROM seat_assignment \
         WHERE member_id = ? ORDER BY shift_id ASC",
    )
    .bind(member_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
