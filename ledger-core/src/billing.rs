//! Billing calculations using rust_decimal for precision
//!
//! All money arithmetic is done with `Decimal` internally, then converted to
//! `f64` for storage/serialization. The two derived fields are:
//!
//! - `amount_paid = cash_paid + online_paid`
//! - `due_amount  = fee - discount - amount_paid`
//!
//! `due_amount` is stored exactly as computed. A discount plus payments
//! exceeding the fee yields a negative due; the write paths keep it.

use crate::error::AppError;
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed fee / discount / payment amount
const MAX_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate that a money input is a finite, non-negative amount within bounds.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a payment amount: finite, strictly positive, within bounds.
pub fn validate_payment_amount(value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "payment amount must be a finite number, got {value}"
        )));
    }
    if value <= 0.0 {
        return Err(AppError::validation(format!(
            "payment amount must be positive, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "payment amount exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// `amount_paid = cash_paid + online_paid`
pub fn paid_total(cash: f64, online: f64) -> f64 {
    to_f64(to_decimal(cash) + to_decimal(online))
}

/// `due_amount = fee - discount - paid`. Not clamped at zero.
pub fn due_amount(fee: f64, discount: f64, paid: f64) -> f64 {
    to_f64(to_decimal(fee) - to_decimal(discount) - to_decimal(paid))
}
