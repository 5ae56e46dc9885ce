//! Membership lifecycle and billing ledger core
//!
//! Transactional logic for a seat/resource-subscription service: study
//! seats bound to time shifts, and personal lockers, tracked per branch.
//! Five lifecycle operations (enroll, edit, renew, set_active,
//! delete_forever) plus a payment processor, all executed as all-or-nothing
//! SQLite transactions. Scarce resources are allocated through storage
//! UNIQUE constraints, not pre-checks.
//!
//! Routing, authentication schemes, and presentation belong to external
//! collaborators: callers pass a resolved [`auth::AuthContext`] into every
//! operation.

pub mod auth;
pub mod billing;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod membership;
pub mod payments;
pub mod queries;
pub mod validation;

pub use auth::AuthContext;
pub use config::Config;
pub use db::DbService;
pub use error::{AppError, AppResult};
pub use membership::MembershipService;
pub use payments::{PaymentOutcome, PaymentService};
pub use queries::QueryService;
