//! Read-only roster and status queries
//!
//! Status is always derived from `end_date` against today's date at query
//! time; nothing here writes. ISO-8601 date text compares correctly in
//! SQLite, so the comparisons bind `NaiveDate` values directly.

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

use shared::models::MemberProjection;
use shared::util;

use crate::auth::{AuthContext, PERM_REPORTS_VIEW};
use crate::db::DbService;
use crate::error::AppResult;

const PROJECTION_SELECT: &str = "SELECT m.id, m.name, m.phone, m.branch_id, m.start_date, \
     m.end_date, m.due_amount, m.is_active, NULL AS seat_label FROM member m";

#[derive(Clone)]
pub struct QueryService {
    pool: SqlitePool,
}

impl QueryService {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    /// Members whose membership has not ended, flag on.
    pub async fn active_members(
        &self,
        ctx: &AuthContext,
        branch_id: Option<i64>,
    ) -> AppResult<Vec<MemberProjection>> {
        ctx.require(PERM_REPORTS_VIEW)?;
        self.members_where(
            "m.is_active = 1 AND m.end_date >= ?",
            vec![util::today()],
            branch_id,
        )
        .await
    }

    /// Members whose membership end date has passed.
    pub async fn expired_members(
        &self,
        ctx: &AuthContext,
        branch_id: Option<i64>,
    ) -> AppResult<Vec<MemberProjection>> {
        ctx.require(PERM_REPORTS_VIEW)?;
        self.members_where("m.end_date < ?", vec![util::today()], branch_id)
            .await
    }

    /// Members whose membership ends within the next `window_days` days
    /// (today inclusive).
    pub async fn expiring_soon(
        &self,
        ctx: &AuthContext,
        window_days: i64,
        branch_id: Option<i64>,
    ) -> AppResult<Vec<MemberProjection>> {
        ctx.require(PERM_REPORTS_VIEW)?;
        let today = util::today();
        let until = today + Duration::days(window_days);
        self.members_where(
            "m.is_active = 1 AND m.end_date >= ? AND m.end_date <= ?",
            vec![today, until],
            branch_id,
        )
        .await
    }

    /// Members holding a seat for the given shift, with seat labels.
    pub async fn roster_for_shift(
        &self,
        ctx: &AuthContext,
        shift_id: i64,
        branch_id: Option<i64>,
    ) -> AppResult<Vec<MemberProjection>> {
        ctx.require(PERM_REPORTS_VIEW)?;
        let mut sql = String::from(
            "SELECT m.id, m.name, m.phone, m.branch_id, m.start_date, m.end_date, \
             m.due_amount, m.is_active, s.label AS seat_label \
             FROM member m \
             JOIN seat_assignment a ON a.member_id = m.id \
             JOIN seat s ON s.id = a.seat_id \
             WHERE a.shift_id = ?",
        );
        if branch_id.is_some() {
            sql.push_str(" AND m.branch_id = ?");
        }
        sql.push_str(" ORDER BY s.label ASC");

        let mut query = sqlx::query_as::<_, MemberProjection>(&sql).bind(shift_id);
        if let Some(b) = branch_id {
            query = query.bind(b);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn members_where(
        &self,
        condition: &str,
        dates: Vec<NaiveDate>,
        branch_id: Option<i64>,
    ) -> AppResult<Vec<MemberProjection>> {
        let mut sql = format!("{PROJECTION_SELECT} WHERE {condition}");
        if branch_id.is_some() {
            sql.push_str(" AND m.branch_id = ?");
        }
        sql.push_str(" ORDER BY m.end_date ASC, m.name ASC");

        let mut query = sqlx::query_as::<_, MemberProjection>(&sql);
        for d in dates {
            query = query.bind(d);
        }
        if let Some(b) = branch_id {
            query = query.bind(b);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}
