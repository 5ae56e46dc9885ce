//! Shared harness for lifecycle/payment integration tests.

use chrono::NaiveDate;
use ledger_core::db::repository::reference;
use ledger_core::{AuthContext, DbService};
use shared::models::{Branch, Locker, MemberInput, Seat, Shift};

pub struct TestRefs {
    pub branch: Branch,
    pub other_branch: Branch,
    pub morning: Shift,
    pub evening: Shift,
    pub seat_a: Seat,
    pub seat_b: Seat,
    pub locker_1: Locker,
    pub locker_2: Locker,
}

pub async fn setup() -> (DbService, TestRefs) {
    let db = DbService::new_in_memory().await.expect("open db");
    let mut conn = db.pool.acquire().await.expect("acquire");

    let branch = reference::create_branch(&mut conn, "Central", Some("1 Main St"))
        .await
        .expect("branch");
    let other_branch = reference::create_branch(&mut conn, "North", None)
        .await
        .expect("branch");
    let morning = reference::create_shift(&mut conn, "Morning", "06:00", "12:00")
        .await
        .expect("shift");
    let evening = reference::create_shift(&mut conn, "Evening", "16:00", "22:00")
        .await
        .expect("shift");
    let seat_a = reference::create_seat(&mut conn, branch.id, "A-1")
        .await
        .expect("seat");
    let seat_b = reference::create_seat(&mut conn, branch.id, "A-2")
        .await
        .expect("seat");
    let locker_1 = reference::create_locker(&mut conn, branch.id, "L-1")
        .await
        .expect("locker");
    let locker_2 = reference::create_locker(&mut conn, branch.id, "L-2")
        .await
        .expect("locker");

    (
        db,
        TestRefs {
            branch,
            other_branch,
            morning,
            evening,
            seat_a,
            seat_b,
            locker_1,
            locker_2,
        },
    )
}

pub fn admin() -> AuthContext {
    AuthContext::admin("op-1", "Test Admin")
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

/// Baseline enroll payload: fee 1000, no discount, 400 paid in cash.
pub fn enroll_input(refs: &TestRefs, name: &str) -> MemberInput {
    MemberInput {
        name: name.to_string(),
        phone: "5550101".to_string(),
        email: None,
        address: None,
        branch_id: refs.branch.id,
        start_date: date("2026-01-01"),
        end_date: date("2026-01-31"),
        fee: 1000.0,
        discount: 0.0,
        cash_paid: 400.0,
        online_paid: 0.0,
        seat_id: None,
        shift_ids: vec![],
        locker_id: None,
    }
}
