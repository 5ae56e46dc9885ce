//! Billing-period trail repository
//!
//! The trail is append-only for new periods but the open (latest) period may
//! be corrected in place; callers state which with [`PeriodWrite`].

use super::{RepoError, RepoResult};
use shared::models::{MemberPeriod, PeriodSnapshot, PeriodWrite};
use shared::util;
use sqlx::SqliteConnection;

const PERIOD_SELECT: &str = "SELECT id, member_id, start_date, end_date, fee, discount, \
     cash_paid, online_paid, amount_paid, due_amount, seat_id, shift_ids, created_at, \
     updated_at FROM member_period";

/// Write a snapshot into the trail.
///
/// `NewPeriod` appends a row with the next per-member sequence number;
/// `Correction` overwrites the most recent row's fields in place and fails
/// with `NotFound` when the member has no period yet.
pub async fn write(
    conn: &mut SqliteConnection,
    member_id: i64,
    snapshot: &PeriodSnapshot,
    mode: PeriodWrite,
) -> RepoResult<MemberPeriod> {
    match mode {
        PeriodWrite::NewPeriod => append(conn, member_id, snapshot).await,
        PeriodWrite::Correction => overwrite_latest(conn, member_id, snapshot).await,
    }
}

async fn append(
    conn: &mut SqliteConnection,
    member_id: i64,
    snapshot: &PeriodSnapshot,
) -> RepoResult<MemberPeriod> {
    let now = util::now_millis();
    let id = util::snowflake_id();
    let next_no: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(period_no), 0) + 1 FROM member_period WHERE member_id = ?",
    )
    .bind(member_id)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO member_period (id, member_id, period_no, start_date, end_date, fee, \
         discount, cash_paid, online_paid, amount_paid, due_amount, seat_id, shift_ids, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(member_id)
    .bind(next_no)
    .bind(snapshot.start_date)
    .bind(snapshot.end_date)
    .bind(snapshot.fee)
    .bind(snapshot.discount)
    .bind(snapshot.cash_paid)
    .bind(snapshot.online_paid)
    .bind(snapshot.amount_paid)
    .bind(snapshot.due_amount)
    .bind(snapshot.seat_id)
    .bind(util::encode_shift_ids(&snapshot.shift_ids))
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    get(conn, id).await
}

async fn overwrite_latest(
    conn: &mut SqliteConnection,
    member_id: i64,
    snapshot: &PeriodSnapshot,
) -> RepoResult<MemberPeriod> {
    let latest = latest_for_member(conn, member_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {member_id} has no billing period")))?;

    sqlx::query(
        "UPDATE member_period SET start_date = ?, end_date = ?, fee = ?, discount = ?, \
         cash_paid = ?, online_paid = ?, amount_paid = ?, due_amount = ?, seat_id = ?, \
         shift_ids = ?, updated_at = ? WHERE id = ?",
    )
    .bind(snapshot.start_date)
    .bind(snapshot.end_date)
    .bind(snapshot.fee)
    .bind(snapshot.discount)
    .bind(snapshot.cash_paid)
    .bind(snapshot.online_paid)
    .bind(snapshot.amount_paid)
    .bind(snapshot.due_amount)
    .bind(snapshot.seat_id)
    .bind(util::encode_shift_ids(&snapshot.shift_ids))
    .bind(util::now_millis())
    .bind(latest.id)
    .execute(&mut *conn)
    .await?;

    get(conn, latest.id).await
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<MemberPeriod>> {
    let sql = format!("{PERIOD_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MemberPeriod>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn get(conn: &mut SqliteConnection, id: i64) -> RepoResult<MemberPeriod> {
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Billing period {id} not found")))
}

/// The open period: highest per-member sequence number.
pub async fn latest_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> RepoResult<Option<MemberPeriod>> {
    let sql = format!("{PERIOD_SELECT} WHERE member_id = ? ORDER BY period_no DESC LIMIT 1");
    let row = sqlx::query_as::<_, MemberPeriod>(&sql)
        .bind(member_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn list_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> RepoResult<Vec<MemberPeriod>> {
    let sql = format!("{PERIOD_SELECT} WHERE member_id = ? ORDER BY period_no ASC");
    let rows = sqlx::query_as::<_, MemberPeriod>(&sql)
        .bind(member_id)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn count_for_member(conn: &mut SqliteConnection, member_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member_period WHERE member_id = ?")
        .bind(member_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
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
        "UPDATE member_period SET cash_paid = ?, online_paid = ?, amount_paid = ?, \
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
        return Err(RepoError::NotFound(format!("Billing period {id} not found")));
    }
    Ok(())
}

pub async fn delete_all_for_member(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM member_period WHERE member_id = ?")
        .bind(member_id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}
