//! Payment processor
//!
//! Applies a partial payment against a billing period's due balance. The
//! period row and the member head row carry independent copies of the money
//! aggregates; this is the one path where both must move together, so the
//! read-modify-write of both rows shares a single transaction.

use serde::Serialize;
use sqlx::SqlitePool;

use shared::models::{Member, MemberPeriod, PayChannel};
use shared::util;

use crate::auth::{AuthContext, PERM_PAYMENTS_APPLY};
use crate::billing::{self, MONEY_TOLERANCE};
use crate::db::repository::{member, period};
use crate::db::DbService;
use crate::error::{AppError, AppResult};

/// Both rows after a successful payment, as handed to callers (and across
/// whatever transport fronts this library).
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOutcome {
    pub member: Member,
    pub period: MemberPeriod,
}

#[derive(Clone)]
pub struct PaymentService {
    pool: SqlitePool,
}

impl PaymentService {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    /// Pay `amount` through `channel` against the period's due balance.
    ///
    /// Rejects with `Conflict` when the amount exceeds the period's due by
    /// more than the money tolerance (0.01 — float-rounding headroom, not an
    /// overpayment allowance). On success the period row and the owning head
    /// row are decremented identically; partial application is never
    /// observable.
    pub async fn apply_payment(
        &self,
        ctx: &AuthContext,
        period_id: i64,
        amount: f64,
        channel: PayChannel,
    ) -> AppResult<PaymentOutcome> {
        ctx.require(PERM_PAYMENTS_APPLY)?;
        billing::validate_payment_amount(amount)?;

        let mut tx = self.pool.begin().await?;

        let per = period::get(&mut tx, period_id).await?;
        let head = member::get(&mut tx, per.member_id).await?;

        let pay = billing::to_decimal(amount);
        if pay > billing::to_decimal(per.due_amount) + MONEY_TOLERANCE {
            return Err(AppError::conflict(format!(
                "Payment amount ({:.2}) exceeds due balance ({:.2})",
                amount, per.due_amount
            )));
        }

        let (period_cash, period_online, head_cash, head_online) = match channel {
            PayChannel::Cash => (
                billing::to_decimal(per.cash_paid) + pay,
                billing::to_decimal(per.online_paid),
                billing::to_decimal(head.cash_paid) + pay,
                billing::to_decimal(head.online_paid),
            ),
            PayChannel::Online => (
                billing::to_decimal(per.cash_paid),
                billing::to_decimal(per.online_paid) + pay,
                billing::to_decimal(head.cash_paid),
                billing::to_decimal(head.online_paid) + pay,
            ),
        };

        let now = util::now_millis();
        period::update_money(
            &mut tx,
            per.id,
            billing::to_f64(period_cash),
            billing::to_f64(period_online),
            billing::to_f64(billing::to_decimal(per.amount_paid) + pay),
            billing::to_f64(billing::to_decimal(per.due_amount) - pay),
            now,
        )
        .await?;
        member::update_money(
            &mut tx,
            head.id,
            billing::to_f64(head_cash),
            billing::to_f64(head_online),
            billing::to_f64(billing::to_decimal(head.amount_paid) + pay),
            billing::to_f64(billing::to_decimal(head.due_amount) - pay),
            now,
        )
        .await?;

        let per = period::get(&mut tx, period_id).await?;
        let head = member::get(&mut tx, head.id).await?;
        tx.commit().await?;

        tracing::info!(
            member_id = head.id,
            period_id,
            amount,
            channel = ?channel,
            operator = %ctx.operator_id,
            "Payment applied"
        );
        Ok(PaymentOutcome {
            member: head,
            period: per,
        })
    }
}
