//! Branch Model

use serde::{Deserialize, Serialize};

/// Branch reference data — a physical location holding seats and lockers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub created_at: i64,
}
