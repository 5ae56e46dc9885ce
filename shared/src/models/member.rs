//! Member Model
//!
//! The head record: one row per person, always reflecting the current
//! billing period. The audit trail lives in `member_period` rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Member head record.
///
/// Money fields are aggregates for the *current* period and must satisfy
/// `amount_paid == cash_paid + online_paid` and
/// `due_amount == fee - discount - amount_paid` after every write.
/// Active/expired status is derived from `end_date` at read time and is
/// deliberately not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub branch_id: i64,
    /// Back-reference to the locker this member holds, if any.
    pub locker_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    pub discount: f64,
    pub cash_paid: f64,
    pub online_paid: f64,
    pub amount_paid: f64,
    pub due_amount: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Member {
    /// Derived membership status: expired once `end_date` has passed.
    pub fn status_on(&self, today: NaiveDate) -> MemberStatus {
        if self.end_date < today {
            MemberStatus::Expired
        } else {
            MemberStatus::Active
        }
    }
}

/// Derived (never stored) membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Expired,
}

/// Enroll / Edit payload.
///
/// Edit reuses the full shape: the operation is a correction of the current
/// period, so every field is re-stated rather than patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub branch_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub cash_paid: f64,
    #[serde(default)]
    pub online_paid: f64,
    /// Seat to reserve for each shift in `shift_ids`; both or neither.
    pub seat_id: Option<i64>,
    #[serde(default)]
    pub shift_ids: Vec<i64>,
    pub locker_id: Option<i64>,
}

/// Renew payload — a fresh billing period for an existing member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub fee: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub cash_paid: f64,
    #[serde(default)]
    pub online_paid: f64,
    pub seat_id: Option<i64>,
    #[serde(default)]
    pub shift_ids: Vec<i64>,
    pub locker_id: Option<i64>,
}

/// Payment channel for partial payments against a due balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayChannel {
    Cash,
    Online,
}

/// Read-model row returned by the roster/status queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MemberProjection {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub branch_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_amount: f64,
    pub is_active: bool,
    /// Seat label when the projection is scoped to a shift roster.
    pub seat_label: Option<String>,
}

impl MemberProjection {
    /// Same derivation as [`Member::status_on`]: expired once `end_date`
    /// has passed.
    pub fn status_on(&self, today: NaiveDate) -> MemberStatus {
        if self.end_date < today {
            MemberStatus::Expired
        } else {
            MemberStatus::Active
        }
    }
}
