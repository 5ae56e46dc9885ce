//! Lifecycle integration tests: enroll / edit / renew / deactivate / delete
//! against an in-memory database with the real schema.

mod common;

use common::{admin, date, enroll_input, setup};
use ledger_core::db::repository::{assignment, locker, period};
use ledger_core::{AppError, AuthContext, MembershipService};
use shared::models::RenewInput;

fn renew_input(fee: f64) -> RenewInput {
    RenewInput {
        start_date: date("2026-02-01"),
        end_date: date("2026-02-28"),
        fee,
        discount: 0.0,
        cash_paid: 0.0,
        online_paid: 0.0,
        seat_id: None,
        shift_ids: vec![],
        locker_id: None,
    }
}

#[tokio::test]
async fn enroll_computes_money_and_appends_first_period() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);

    let member = svc.enroll(&admin(), enroll_input(&refs, "Alice")).await.unwrap();

    assert_eq!(member.amount_paid, 400.0);
    assert_eq!(member.due_amount, 600.0);
    assert!(member.is_active);

    let periods = svc.member_periods(member.id).await.unwrap();
    assert_eq!(periods.len(), 1);
    let p = &periods[0];
    assert_eq!(p.fee, member.fee);
    assert_eq!(p.due_amount, member.due_amount);
    assert_eq!(p.amount_paid, member.amount_paid);
    assert_eq!(p.start_date, member.start_date);
    assert_eq!(p.end_date, member.end_date);
}

#[tokio::test]
async fn enroll_rejects_invalid_input_before_any_write() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Bob");
    input.name = "   ".to_string();
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::Validation(_))
    ));

    let mut input = enroll_input(&refs, "Bob");
    input.fee = -1.0;
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::Validation(_))
    ));

    let mut input = enroll_input(&refs, "Bob");
    input.end_date = date("2025-12-31"); // before start
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::Validation(_))
    ));

    // Seat without shifts, and shifts without a seat
    let mut input = enroll_input(&refs, "Bob");
    input.seat_id = Some(refs.seat_a.id);
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::Validation(_))
    ));
    let mut input = enroll_input(&refs, "Bob");
    input.shift_ids = vec![refs.morning.id];
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn enroll_rejects_unknown_references() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Bob");
    input.branch_id = 999_999;
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::NotFound(_))
    ));

    // Seat from a different branch is not visible
    let mut input = enroll_input(&refs, "Bob");
    input.branch_id = refs.other_branch.id;
    input.seat_id = Some(refs.seat_a.id);
    input.shift_ids = vec![refs.morning.id];
    assert!(matches!(
        svc.enroll(&ctx, input).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn seat_shift_pair_is_exclusive() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Alice");
    input.seat_id = Some(refs.seat_a.id);
    input.shift_ids = vec![refs.morning.id];
    svc.enroll(&ctx, input).await.unwrap();

    // Same seat, same shift: contention
    let mut input = enroll_input(&refs, "Bob");
    input.phone = "5550102".to_string();
    input.seat_id = Some(refs.seat_a.id);
    input.shift_ids = vec![refs.morning.id];
    let err = svc.enroll(&ctx, input).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // The losing enroll left nothing behind
    let mut conn = db.pool.acquire().await.unwrap();
    let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    assert_eq!(members, 1);
    drop(conn);

    // Same seat, different shift: fine
    let mut input = enroll_input(&refs, "Bob");
    input.phone = "5550102".to_string();
    input.seat_id = Some(refs.seat_a.id);
    input.shift_ids = vec![refs.evening.id];
    svc.enroll(&ctx, input).await.unwrap();
}

#[tokio::test]
async fn storage_constraint_is_the_arbiter_of_seat_exclusivity() {
    // Two writers that both passed a stale "is it free?" check: the second
    // insert must fail on the UNIQUE(seat_id, shift_id) index.
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let a = svc.enroll(&ctx, enroll_input(&refs, "Alice")).await.unwrap();
    let b = {
        let mut input = enroll_input(&refs, "Bob");
        input.phone = "5550102".to_string();
        svc.enroll(&ctx, input).await.unwrap()
    };

    let mut conn = db.pool.acquire().await.unwrap();
    assert_eq!(
        assignment::holder(&mut conn, refs.seat_a.id, refs.morning.id)
            .await
            .unwrap(),
        None
    );
    assignment::reserve(&mut conn, a.id, refs.seat_a.id, refs.morning.id)
        .await
        .unwrap();
    let err = assignment::reserve(&mut conn, b.id, refs.seat_a.id, refs.morning.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ledger_core::db::repository::RepoError::Conflict(_)
    ));
}

#[tokio::test]
async fn locker_binding_is_exclusive_and_bidirectional() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Alice");
    input.locker_id = Some(refs.locker_1.id);
    let alice = svc.enroll(&ctx, input).await.unwrap();
    assert_eq!(alice.locker_id, Some(refs.locker_1.id));

    let mut conn = db.pool.acquire().await.unwrap();
    let l = locker::get(&mut conn, refs.locker_1.id).await.unwrap();
    assert!(l.is_assigned);
    assert_eq!(l.member_id, Some(alice.id));
    drop(conn);

    let mut input = enroll_input(&refs, "Bob");
    input.phone = "5550102".to_string();
    input.locker_id = Some(refs.locker_1.id);
    let err = svc.enroll(&ctx, input).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn edit_corrects_the_open_period_in_place() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let member = svc.enroll(&ctx, enroll_input(&refs, "Alice")).await.unwrap();

    let mut input = enroll_input(&refs, "Alice");
    input.fee = 1200.0;
    input.cash_paid = 500.0;
    let updated = svc.edit(&ctx, member.id, input).await.unwrap();

    assert_eq!(updated.fee, 1200.0);
    assert_eq!(updated.amount_paid, 500.0);
    assert_eq!(updated.due_amount, 700.0);

    // The trail did not grow; the single row was rewritten
    let periods = svc.member_periods(member.id).await.unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].fee, 1200.0);
    assert_eq!(periods[0].due_amount, 700.0);
}

#[tokio::test]
async fn edit_swaps_locker_and_releases_the_old_one() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Alice");
    input.locker_id = Some(refs.locker_1.id);
    let member = svc.enroll(&ctx, input).await.unwrap();

    let mut input = enroll_input(&refs, "Alice");
    input.locker_id = Some(refs.locker_2.id);
    let updated = svc.edit(&ctx, member.id, input).await.unwrap();
    assert_eq!(updated.locker_id, Some(refs.locker_2.id));

    let mut conn = db.pool.acquire().await.unwrap();
    let old = locker::get(&mut conn, refs.locker_1.id).await.unwrap();
    assert!(!old.is_assigned);
    assert_eq!(old.member_id, None);
    let new = locker::get(&mut conn, refs.locker_2.id).await.unwrap();
    assert_eq!(new.member_id, Some(member.id));

    // The member-side lookup agrees with the locker rows
    let held = locker::find_for_member(&mut conn, member.id).await.unwrap();
    assert_eq!(held.map(|l| l.id), Some(refs.locker_2.id));
}

#[tokio::test]
async fn edit_missing_member_is_not_found() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let err = svc
        .edit(&admin(), 42, enroll_input(&refs, "Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn renew_appends_a_period_and_preserves_the_first() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let member = svc.enroll(&ctx, enroll_input(&refs, "Alice")).await.unwrap();
    let before = svc.member_periods(member.id).await.unwrap();
    assert_eq!(before.len(), 1);

    let renewed = svc.renew(&ctx, member.id, renew_input(1200.0)).await.unwrap();
    assert_eq!(renewed.fee, 1200.0);
    assert_eq!(renewed.due_amount, 1200.0);
    assert_eq!(renewed.start_date, date("2026-02-01"));

    let after = svc.member_periods(member.id).await.unwrap();
    assert_eq!(after.len(), 2);
    // First period is byte-for-byte what it was before the renewal
    assert_eq!(after[0].id, before[0].id);
    assert_eq!(after[0].fee, before[0].fee);
    assert_eq!(after[0].due_amount, before[0].due_amount);
    assert_eq!(after[0].updated_at, before[0].updated_at);
    // Second period mirrors the new head
    assert_eq!(after[1].fee, 1200.0);
}

#[tokio::test]
async fn renew_reinstates_a_deactivated_member() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let member = svc.enroll(&ctx, enroll_input(&refs, "Alice")).await.unwrap();
    svc.set_active(&ctx, member.id, false).await.unwrap();

    let renewed = svc.renew(&ctx, member.id, renew_input(1000.0)).await.unwrap();
    assert!(renewed.is_active);
}

#[tokio::test]
async fn deactivate_releases_resources_but_keeps_the_trail() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Alice");
    input.seat_id = Some(refs.seat_a.id);
    input.shift_ids = vec![refs.morning.id, refs.evening.id];
    input.locker_id = Some(refs.locker_1.id);
    let member = svc.enroll(&ctx, input).await.unwrap();

    let off = svc.set_active(&ctx, member.id, false).await.unwrap();
    assert!(!off.is_active);
    assert_eq!(off.locker_id, None);
    // Money untouched
    assert_eq!(off.due_amount, member.due_amount);
    assert_eq!(off.amount_paid, member.amount_paid);

    let mut conn = db.pool.acquire().await.unwrap();
    assert!(assignment::list_for_member(&mut conn, member.id)
        .await
        .unwrap()
        .is_empty());
    let l = locker::get(&mut conn, refs.locker_1.id).await.unwrap();
    assert!(!l.is_assigned);
    assert_eq!(
        period::count_for_member(&mut conn, member.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn reactivate_only_flips_the_flag() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let member = svc.enroll(&ctx, enroll_input(&refs, "Alice")).await.unwrap();
    svc.set_active(&ctx, member.id, false).await.unwrap();
    let back = svc.set_active(&ctx, member.id, true).await.unwrap();
    assert!(back.is_active);
    assert_eq!(back.locker_id, None);
}

#[tokio::test]
async fn delete_forever_cascades_everything() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let ctx = admin();

    let mut input = enroll_input(&refs, "Alice");
    input.seat_id = Some(refs.seat_a.id);
    input.shift_ids = vec![refs.morning.id];
    input.locker_id = Some(refs.locker_1.id);
    let member = svc.enroll(&ctx, input).await.unwrap();
    svc.renew(&ctx, member.id, renew_input(1000.0)).await.unwrap();

    svc.delete_forever(&ctx, member.id).await.unwrap();

    assert!(svc.find_member(member.id).await.unwrap().is_none());
    let mut conn = db.pool.acquire().await.unwrap();
    assert_eq!(
        period::count_for_member(&mut conn, member.id).await.unwrap(),
        0
    );
    assert!(assignment::list_for_member(&mut conn, member.id)
        .await
        .unwrap()
        .is_empty());
    let l = locker::get(&mut conn, refs.locker_1.id).await.unwrap();
    assert!(!l.is_assigned);
    drop(conn);

    // Deleting again: nothing left to find
    assert!(matches!(
        svc.delete_forever(&ctx, member.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn lifecycle_operations_are_permission_gated() {
    let (db, refs) = setup().await;
    let svc = MembershipService::new(&db);
    let viewer = AuthContext::new("op-9", "Viewer", vec!["reports:view".to_string()]);

    assert!(matches!(
        svc.enroll(&viewer, enroll_input(&refs, "Alice")).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        svc.delete_forever(&viewer, 1).await,
        Err(AppError::Forbidden(_))
    ));
}
