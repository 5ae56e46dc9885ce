//! Member head-record repository

use super::{RepoError, RepoResult};
use shared::models::Member;
use sqlx::SqliteConnection;

const MEMBER_SELECT: &str = "SELECT id, name, phone, email, address, branch_id, locker_id, \
     start_date, end_date, fee, discount, cash_paid, online_paid, amount_paid, due_amount, \
     is_active, created_at, updated_at FROM member";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Load a member or fail with `NotFound`.
pub async fn get(conn: &mut SqliteConnection, id: i64) -> RepoResult<Member> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))
}

pub async fn insert(conn: &mut SqliteConnection, member: &Member) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO member (id, name, phone, email, address, branch_id, locker_id, \
         start_date, end_date, fee, discount, cash_paid, online_paid, amount_paid, \
         due_amount, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(member.id)
    .bind(&member.name)
    .bind(&member.phone)
    .bind(&member.email)
    .bind(&member.address)
    .bind(member.branch_id)
    .bind(member.locker_id)
    .bind(member.start_date)
    .bind(member.end_date)
    .bind(member.fee)
    .bind(member.discount)
    .bind(member.cash_paid)
    .bind(member.online_paid)
    .bind(member.amount_paid)
    .bind(member.due_amount)
    .bind(member.is_active)
    .bind(member.created_at)
    .bind(member.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Overwrite all mutable head fields (Edit / Renew paths).
pub async fn update_head(conn: &mut SqliteConnection, member: &Member) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE member SET name = ?, phone = ?, email = ?, address = ?, branch_id = ?, \
         start_date = ?, end_date = ?, fee = ?, discount = ?, cash_paid = ?, \
         online_paid = ?, amount_paid = ?, due_amount = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&member.name)
    .bind(&member.phone)
    .bind(&member.email)
    .bind(&member.address)
    .bind(member.branch_id)
    .bind(member.start_date)
    .bind(member.end_date)
    .bind(member.fee)
    .bind(member.discount)
    .bind(member.cash_paid)
    .bind(member.online_paid)
    .bind(member.amount_paid)
    .bind(member.due_amount)
    .bind(member.updated_at)
    .bind(member.id)
    .execute(conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {} not found", member.id)));
    }
    Ok(())
}

/// Write the payment aggregates (absolute values, computed by the caller).
pub async fn update_money(
    conn: &mut SqliteConnection,
    id: i64,
    cash_paid: f64,
    online_paid: f64,
    amount_paid: f64,
    due_amount: f64,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE member SET cash_paid = ?, online_paid = ?, amount_paid = ?, \
         due_amount = ?, updated_at = ? WHERE id = ?",
    )
    .bind(cash_paid)
    .bind(online_paid)
    .bind(amount_paid)
    .bind(due_amount)
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    Ok(())
}

pub async fn set_active(
    conn: &mut SqliteConnection,
    id: i64,
    active: bool,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE member SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(active)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    Ok(())
}

/// Set or clear the head row's locker back-reference.
pub async fn set_locker_ref(
    conn: &mut SqliteConnection,
    id: i64,
    locker_id: Option<i64>,
    now: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE member SET locker_id = ?, updated_at = ? WHERE id = ?")
        .bind(locker_id)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    Ok(())
}
