//! Locker Model

use serde::{Deserialize, Serialize};

/// A personal locker, scoped to one branch.
///
/// Invariant: `is_assigned` is true iff `member_id` is set, and the
/// referenced member's head row points back at this locker. Exclusivity is
/// enforced by a partial UNIQUE index on `member_id` in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Locker {
    pub id: i64,
    pub branch_id: i64,
    pub label: String,
    pub is_assigned: bool,
    pub member_id: Option<i64>,
    pub created_at: i64,
}
