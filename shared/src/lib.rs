//! Shared types for the seat-subscription membership ledger
//!
//! Domain models and ID/time utilities used by `ledger-core` and any
//! front-end consuming its API surface.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
