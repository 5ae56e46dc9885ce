//! Caller identity and permission gating
//!
//! Authentication itself is an external collaborator: callers arrive with an
//! already-resolved identity and permission set. The context is threaded as
//! an explicit parameter into every lifecycle/payment call — nothing is
//! pulled from ambient request state.

use crate::error::AppError;

/// Membership lifecycle operations (enroll/edit/renew/deactivate/delete).
pub const PERM_MEMBERS_MANAGE: &str = "members:manage";
/// Applying partial payments against a due balance.
pub const PERM_PAYMENTS_APPLY: &str = "payments:apply";
/// Read-only roster and status queries.
pub const PERM_REPORTS_VIEW: &str = "reports:view";

/// Configurable permissions (excludes the `all` wildcard).
pub const ALL_PERMISSIONS: &[&str] = &[
    PERM_MEMBERS_MANAGE,
    PERM_PAYMENTS_APPLY,
    PERM_REPORTS_VIEW,
];

/// Resolved caller identity + permission set.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub operator_id: String,
    pub operator_name: String,
    pub permissions: Vec<String>,
}

impl AuthContext {
    pub fn new(
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
        permissions: Vec<String>,
    ) -> Self {
        Self {
            operator_id: operator_id.into(),
            operator_name: operator_name.into(),
            permissions,
        }
    }

    /// Context holding the `all` wildcard (admin, and test setup).
    pub fn admin(operator_id: impl Into<String>, operator_name: impl Into<String>) -> Self {
        Self::new(operator_id, operator_name, vec!["all".to_string()])
    }

    pub fn has(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p == "all" || p == permission)
    }

    /// Gate an operation behind a permission.
    pub fn require(&self, permission: &str) -> Result<(), AppError> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(permission.to_string()))
        }
    }
}

/// Default permission sets per role name.
pub fn default_permissions(role_name: &str) -> Vec<String> {
    let perms: &[&str] = match role_name {
        "admin" => &["all"],
        "manager" => ALL_PERMISSIONS,
        "staff" => &[PERM_PAYMENTS_APPLY, PERM_REPORTS_VIEW],
        _ => &[],
    };
    perms.iter().map(|s| s.to_string()).collect()
}
