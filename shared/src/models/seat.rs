//! Seat and Assignment Models

use serde::{Deserialize, Serialize};

/// A physical study seat, scoped to one branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Seat {
    pub id: i64,
    pub branch_id: i64,
    /// Human label ("A-12"); unique within the branch.
    pub label: String,
    pub created_at: i64,
}

/// Exclusive binding of one (seat, shift) pair to one member.
///
/// The `(seat_id, shift_id)` pair carries a UNIQUE constraint in storage;
/// the insert itself is the arbiter of exclusivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SeatAssignment {
    pub id: i64,
    pub member_id: i64,
    pub seat_id: i64,
    pub shift_id: i64,
    pub created_at: i64,
}
