//! Reference-data lookups: branches, shifts, seats
//!
//! Plain invariant-free lookups consumed by lifecycle validation, plus the
//! minimal inserts needed to provision a branch. Full reference CRUD lives
//! with an external collaborator.

use super::{RepoError, RepoResult};
use shared::models::{Branch, Seat, Shift};
use shared::util;
use sqlx::SqliteConnection;

pub async fn branch_exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let row: Option<i64> = sqlx::query_scalar("SELECT id FROM branch WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

pub async fn shift_exists(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let row: Option<i64> = sqlx::query_scalar("SELECT id FROM shift WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

/// A seat lookup scoped to its branch; `None` when the seat does not exist
/// or belongs to a different branch.
pub async fn find_seat_in_branch(
    conn: &mut SqliteConnection,
    seat_id: i64,
    branch_id: i64,
) -> RepoResult<Option<Seat>> {
    let row = sqlx::query_as::<_, Seat>(
        "SELECT id, branch_id, label, created_at FROM seat WHERE id = ? AND branch_id = ?",
    )
    .bind(seat_id)
    .bind(branch_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create_branch(
    conn: &mut SqliteConnection,
    name: &str,
    address: Option<&str>,
) -> RepoResult<Branch> {
    let id = util::snowflake_id();
    let now = util::now_millis();
    sqlx::query("INSERT INTO branch (id, name, address, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(Branch {
        id,
        name: name.to_string(),
        address: address.map(|s| s.to_string()),
        created_at: now,
    })
}

pub async fn create_shift(
    conn: &mut SqliteConnection,
    name: &str,
    start_time: &str,
    end_time: &str,
) -> RepoResult<Shift> {
    let id = util::snowflake_id();
    let now = util::now_millis();
    sqlx::query(
        "INSERT INTO shift (id, name, start_time, end_time, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(Shift {
        id,
        name: name.to_string(),
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        created_at: now,
    })
}

pub async fn create_seat(
    conn: &mut SqliteConnection,
    branch_id: i64,
    label: &str,
) -> RepoResult<Seat> {
    let id = util::snowflake_id();
    let now = util::now_millis();
    sqlx::query("INSERT INTO seat (id, branch_id, label, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(branch_id)
        .bind(label)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    Ok(Seat {
        id,
        branch_id,
        label: label.to_string(),
        created_at: now,
    })
}

pub async fn create_locker(
    conn: &mut SqliteConnection,
    branch_id: i64,
    label: &str,
) -> RepoResult<shared::models::Locker> {
    let id = util::snowflake_id();
    let now = util::now_millis();
    sqlx::query(
        "INSERT INTO locker (id, branch_id, label, is_assigned, member_id, created_at) \
         VALUES (?, ?, ?, 0, NULL, ?)",
    )
    .bind(id)
    .bind(branch_id)
    .bind(label)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(shared::models::Locker {
        id,
        branch_id,
        label: label.to_string(),
        is_assigned: false,
        member_id: None,
        created_at: now,
    })
}

/// Locker lookup scoped to its branch.
pub async fn find_locker_in_branch(
    conn: &mut SqliteConnection,
    locker_id: i64,
    branch_id: i64,
) -> RepoResult<Option<shared::models::Locker>> {
    let row = sqlx::query_as::<_, shared::models::Locker>(
        "SELECT id, branch_id, label, is_assigned, member_id, created_at FROM locker \
         WHERE id = ? AND branch_id = ?",
    )
    .bind(locker_id)
    .bind(branch_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Existence check that produces the orchestrator's `NotFound` directly.
pub async fn require_branch(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    if branch_exists(conn, id).await? {
        Ok(())
    } else {
        Err(RepoError::NotFound(format!("Branch {id} not found")))
    }
}

pub async fn require_shift(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    if shift_exists(conn, id).await? {
        Ok(())
    } else {
        Err(RepoError::NotFound(format!("Shift {id} not found")))
    }
}
