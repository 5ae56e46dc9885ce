//! Billing Period Model (audit trail)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One billing period of a member: an audit snapshot of all money/date/
/// assignment fields taken at a lifecycle transition.
///
/// Appended at Enroll and Renew; the most recent row is corrected in place
/// at Edit (see [`PeriodWrite`]). `shift_ids` is the JSON-encoded list of
/// shift IDs the seat was reserved for when the snapshot was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberPeriod {
    pub id: i64,
    pub member_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub discount: f64,
    pub cash_paid: f64,
    pub online_paid: f64,
    pub amount_paid: f64,
    pub due_amount: f64,
    pub seat_id: Option<i64>,
    /// JSON array of shift IDs, e.g. `"[101,102]"`.
    pub shift_ids: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MemberPeriod {
    /// Decode the JSON shift-id column.
    pub fn shift_id_list(&self) -> Vec<i64> {
        crate::util::decode_shift_ids(&self.shift_ids)
    }
}

/// How a period snapshot is written to the trail.
///
/// The trail is not uniformly append-only: Edit corrects the open period in
/// place while Renew starts a new one. Callers state which they mean
/// instead of the trail inferring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodWrite {
    /// Append a row — the start of a new billing period (Enroll, Renew).
    NewPeriod,
    /// Overwrite the member's most recent row in place (Edit).
    Correction,
}

/// Field set written into a period row (everything except identity).
#[derive(Debug, Clone)]
pub struct PeriodSnapshot {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub discount: f64,
    pub cash_paid: f64,
    pub online_paid: f64,
    pub amount_paid: f64,
    pub due_amount: f64,
    pub seat_id: Option<i64>,
    pub shift_ids: Vec<i64>,
}
