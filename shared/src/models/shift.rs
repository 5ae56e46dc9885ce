//! Shift Model
//!
//! A recurring time window a seat can be booked for (e.g. "Morning
//! 06:00-12:00"). Branch-independent reference data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub name: String,
    /// Start of the window, "HH:MM"
    pub start_time: String,
    /// End of the window, "HH:MM"
    pub end_time: String,
    pub created_at: i64,
}
