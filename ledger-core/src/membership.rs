//! Membership lifecycle orchestrator
//!
//! Five operations — enroll, edit, renew, set_active, delete_forever — each
//! executed as: permission gate → input validation (no writes) → one
//! transaction → commit. Any error rolls the whole transaction back; the
//! resource registry and the ledger are left exactly as before the call.

use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool, Transaction};

use shared::models::{Member, MemberInput, MemberPeriod, PeriodSnapshot, PeriodWrite, RenewInput};
use shared::util;

use crate::auth::{AuthContext, PERM_MEMBERS_MANAGE};
use crate::billing;
use crate::db::repository::{assignment, locker, member, period, reference};
use crate::db::DbService;
use crate::error::{AppError, AppResult};
use crate::validation::{
    validate_optional_text, validate_required_text, MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN,
    MAX_SHORT_TEXT_LEN,
};

/// Orchestrates the member head record, the billing-period trail, and the
/// resource registry (seat assignments, lockers).
#[derive(Clone)]
pub struct MembershipService {
    pool: SqlitePool,
}

impl MembershipService {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    /// Create a member with their first billing period.
    ///
    /// Reserves the requested seat+shift pairs and locker; a pair or locker
    /// held by another member fails the whole operation with `Conflict`.
    pub async fn enroll(&self, ctx: &AuthContext, input: MemberInput) -> AppResult<Member> {
        ctx.require(PERM_MEMBERS_MANAGE)?;
        validate_member_input(&input)?;

        let mut tx = self.pool.begin().await?;
        validate_references(&mut tx, &input).await?;

        let now = util::now_millis();
        let amount_paid = billing::paid_total(input.cash_paid, input.online_paid);
        let due_amount = billing::due_amount(input.fee, input.discount, amount_paid);

        let head = Member {
            id: util::snowflake_id(),
            name: input.name.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            branch_id: input.branch_id,
            locker_id: None,
            start_date: input.start_date,
            end_date: input.end_date,
            fee: input.fee,
            discount: input.discount,
            cash_paid: input.cash_paid,
            online_paid: input.online_paid,
            amount_paid,
            due_amount,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        member::insert(&mut tx, &head).await?;

        reserve_resources(&mut tx, head.id, &input).await?;

        period::write(
            &mut tx,
            head.id,
            &snapshot_of(&input, amount_paid, due_amount),
            PeriodWrite::NewPeriod,
        )
        .await?;

        let created = member::get(&mut tx, head.id).await?;
        tx.commit().await?;

        tracing::info!(
            member_id = created.id,
            operator = %ctx.operator_id,
            "Member enrolled"
        );
        Ok(created)
    }

    /// Correct the current billing period in place.
    ///
    /// Resources are re-reserved against the new seat/shift/locker set; the
    /// trail's row count does not change.
    pub async fn edit(
        &self,
        ctx: &AuthContext,
        member_id: i64,
        input: MemberInput,
    ) -> AppResult<Member> {
        ctx.require(PERM_MEMBERS_MANAGE)?;
        validate_member_input(&input)?;

        let mut tx = self.pool.begin().await?;
        let existing = member::get(&mut tx, member_id).await?;
        validate_references(&mut tx, &input).await?;

        let amount_paid = billing::paid_total(input.cash_paid, input.online_paid);
        let due_amount = billing::due_amount(input.fee, input.discount, amount_paid);

        let head = Member {
            name: input.name.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            branch_id: input.branch_id,
            start_date: input.start_date,
            end_date: input.end_date,
            fee: input.fee,
            discount: input.discount,
            cash_paid: input.cash_paid,
            online_paid: input.online_paid,
            amount_paid,
            due_amount,
            updated_at: util::now_millis(),
            ..existing
        };
        member::update_head(&mut tx, &head).await?;

        assignment::release_all(&mut tx, member_id).await?;
        reserve_resources(&mut tx, member_id, &input).await?;

        period::write(
            &mut tx,
            member_id,
            &snapshot_of(&input, amount_paid, due_amount),
            PeriodWrite::Correction,
        )
        .await?;

        let updated = member::get(&mut tx, member_id).await?;
        tx.commit().await?;

        tracing::info!(
            member_id,
            operator = %ctx.operator_id,
            "Member edited (current period corrected)"
        );
        Ok(updated)
    }

    /// Start a new billing period for an existing member.
    ///
    /// Appends to the trail; prior period rows are left untouched. The head
    /// record reflects the new period's dates and amounts afterwards.
    pub async fn renew(
        &self,
        ctx: &AuthContext,
        member_id: i64,
        input: RenewInput,
    ) -> AppResult<Member> {
        ctx.require(PERM_MEMBERS_MANAGE)?;
        validate_renew_input(&input)?;

        let mut tx = self.pool.begin().await?;
        let existing = member::get(&mut tx, member_id).await?;

        let as_member_input = MemberInput {
            name: existing.name.clone(),
            phone: existing.phone.clone(),
            email: existing.email.clone(),
            address: existing.address.clone(),
            branch_id: existing.branch_id,
            start_date: input.start_date,
            end_date: input.end_date,
            fee: input.fee,
            discount: input.discount,
            cash_paid: input.cash_paid,
            online_paid: input.online_paid,
            seat_id: input.seat_id,
            shift_ids: input.shift_ids.clone(),
            locker_id: input.locker_id,
        };
        validate_references(&mut tx, &as_member_input).await?;

        let amount_paid = billing::paid_total(input.cash_paid, input.online_paid);
        let due_amount = billing::due_amount(input.fee, input.discount, amount_paid);

        let head = Member {
            start_date: input.start_date,
            end_date: input.end_date,
            fee: input.fee,
            discount: input.discount,
            cash_paid: input.cash_paid,
            online_paid: input.online_paid,
            amount_paid,
            due_amount,
            updated_at: util::now_millis(),
            ..existing
        };
        member::update_head(&mut tx, &head).await?;
        if !head.is_active {
            // A renewal reinstates a deactivated member
            member::set_active(&mut tx, member_id, true, util::now_millis()).await?;
        }

        assignment::release_all(&mut tx, member_id).await?;
        reserve_resources(&mut tx, member_id, &as_member_input).await?;

        period::write(
            &mut tx,
            member_id,
            &snapshot_of(&as_member_input, amount_paid, due_amount),
            PeriodWrite::NewPeriod,
        )
        .await?;

        let updated = member::get(&mut tx, member_id).await?;
        tx.commit().await?;

        tracing::info!(
            member_id,
            operator = %ctx.operator_id,
            "Membership renewed (new period appended)"
        );
        Ok(updated)
    }

    /// Flip the active flag.
    ///
    /// Deactivating releases every seat assignment and the locker; money
    /// fields and the billing trail are untouched. Re-activating only flips
    /// the flag — resources come back via edit or renew.
    pub async fn set_active(
        &self,
        ctx: &AuthContext,
        member_id: i64,
        active: bool,
    ) -> AppResult<Member> {
        ctx.require(PERM_MEMBERS_MANAGE)?;

        let mut tx = self.pool.begin().await?;
        member::get(&mut tx, member_id).await?;
        member::set_active(&mut tx, member_id, active, util::now_millis()).await?;
        if !active {
            assignment::release_all(&mut tx, member_id).await?;
            locker::release(&mut tx, member_id).await?;
        }
        let updated = member::get(&mut tx, member_id).await?;
        tx.commit().await?;

        tracing::info!(
            member_id,
            active,
            operator = %ctx.operator_id,
            "Member active flag changed"
        );
        Ok(updated)
    }

    /// Irreversibly remove a member and everything attached to them:
    /// seat assignments, locker binding, the whole billing trail, then the
    /// head row. No tombstone is kept.
    pub async fn delete_forever(&self, ctx: &AuthContext, member_id: i64) -> AppResult<()> {
        ctx.require(PERM_MEMBERS_MANAGE)?;

        let mut tx = self.pool.begin().await?;
        member::get(&mut tx, member_id).await?;
        assignment::release_all(&mut tx, member_id).await?;
        locker::release(&mut tx, member_id).await?;
        period::delete_all_for_member(&mut tx, member_id).await?;
        member::delete(&mut tx, member_id).await?;
        tx.commit().await?;

        tracing::warn!(
            member_id,
            operator = %ctx.operator_id,
            "Member permanently deleted"
        );
        Ok(())
    }

    /// Detail read: the head record.
    pub async fn find_member(&self, member_id: i64) -> AppResult<Option<Member>> {
        let mut conn = self.pool.acquire().await?;
        Ok(member::find_by_id(&mut conn, member_id).await?)
    }

    /// Detail read: the full billing trail, oldest first.
    pub async fn member_periods(&self, member_id: i64) -> AppResult<Vec<MemberPeriod>> {
        let mut conn = self.pool.acquire().await?;
        member::get(&mut conn, member_id).await?;
        Ok(period::list_for_member(&mut conn, member_id).await?)
    }
}

/// Reserve the requested seat+shift pairs and locker inside `tx`.
async fn reserve_resources(
    tx: &mut Transaction<'_, Sqlite>,
    member_id: i64,
    input: &MemberInput,
) -> AppResult<()> {
    if let Some(seat_id) = input.seat_id {
        for &shift_id in &input.shift_ids {
            assignment::reserve(tx, member_id, seat_id, shift_id).await?;
        }
    }
    match input.locker_id {
        Some(locker_id) => locker::reserve(tx, locker_id, member_id).await?,
        None => locker::release(tx, member_id).await?,
    }
    Ok(())
}

fn snapshot_of(input: &MemberInput, amount_paid: f64, due_amount: f64) -> PeriodSnapshot {
    PeriodSnapshot {
        start_date: input.start_date,
        end_date: input.end_date,
        fee: input.fee,
        discount: input.discount,
        cash_paid: input.cash_paid,
        online_paid: input.online_paid,
        amount_paid,
        due_amount,
        seat_id: input.seat_id,
        shift_ids: input.shift_ids.clone(),
    }
}

fn validate_dates(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if end < start {
        return Err(AppError::validation(format!(
            "end_date {end} is before start_date {start}"
        )));
    }
    Ok(())
}

fn validate_money_fields(fee: f64, discount: f64, cash: f64, online: f64) -> AppResult<()> {
    billing::validate_amount(fee, "fee")?;
    billing::validate_amount(discount, "discount")?;
    billing::validate_amount(cash, "cash_paid")?;
    billing::validate_amount(online, "online_paid")?;
    Ok(())
}

fn validate_seat_request(seat_id: Option<i64>, shift_ids: &[i64]) -> AppResult<()> {
    match (seat_id, shift_ids.is_empty()) {
        (Some(_), true) => Err(AppError::validation(
            "a seat reservation requires at least one shift",
        )),
        (None, false) => Err(AppError::validation(
            "shift reservations require a seat",
        )),
        _ => Ok(()),
    }
}

fn validate_member_input(input: &MemberInput) -> AppResult<()> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&input.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&input.address, "address", MAX_ADDRESS_LEN)?;
    validate_dates(input.start_date, input.end_date)?;
    validate_money_fields(input.fee, input.discount, input.cash_paid, input.online_paid)?;
    validate_seat_request(input.seat_id, &input.shift_ids)?;
    Ok(())
}

fn validate_renew_input(input: &RenewInput) -> AppResult<()> {
    validate_dates(input.start_date, input.end_date)?;
    validate_money_fields(input.fee, input.discount, input.cash_paid, input.online_paid)?;
    validate_seat_request(input.seat_id, &input.shift_ids)?;
    Ok(())
}

/// Validate branch/shift/seat/locker references inside the transaction.
async fn validate_references(
    tx: &mut Transaction<'_, Sqlite>,
    input: &MemberInput,
) -> AppResult<()> {
    reference::require_branch(tx, input.branch_id).await?;
    for &shift_id in &input.shift_ids {
        reference::require_shift(tx, shift_id).await?;
    }
    if let Some(seat_id) = input.seat_id {
        reference::find_seat_in_branch(tx, seat_id, input.branch_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Seat {seat_id} not found in branch {}",
                    input.branch_id
                ))
            })?;
    }
    if let Some(locker_id) = input.locker_id {
        reference::find_locker_in_branch(tx, locker_id, input.branch_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Locker {locker_id} not found in branch {}",
                    input.branch_id
                ))
            })?;
    }
    Ok(())
}
