//! Data models
//!
//! Shared between ledger-core and any API front-end.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod branch;
pub mod locker;
pub mod member;
pub mod period;
pub mod seat;
pub mod shift;

// Re-exports
pub use branch::*;
pub use locker::*;
pub use member::*;
pub use period::*;
pub use seat::*;
pub use shift::*;
