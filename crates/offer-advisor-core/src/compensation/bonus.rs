//! Bonus amount ↔ bonus months reconciliation.
//!
//! The amount is what a recruiter types; months are a convenience view over
//! it. Each setter derives the other field once, from the current
//! `base_monthly`. A later change of `base_monthly` does not rescale either
//! side, so the pair only round-trips while the base stays fixed, and the
//! rounding in [`set_bonus_months`] is lossy.

use rust_decimal::{Decimal, RoundingStrategy};

use super::record::CompensationRecord;
use crate::types::{round_currency, Money, Months};

/// Set the annual bonus amount; `bonus_months` follows when the base is
/// positive and is left as-is otherwise.
pub fn set_bonus_amount(record: &CompensationRecord, amount: Money) -> CompensationRecord {
    let mut next = record.clone();
    next.performance_bonus = amount;
    if record.base_monthly > Decimal::ZERO {
        next.bonus_months = amount / record.base_monthly;
    }
    next
}

/// Set the bonus as a multiple of base; the amount becomes
/// `round(base_monthly * months)`.
pub fn set_bonus_months(record: &CompensationRecord, months: Months) -> CompensationRecord {
    let mut next = record.clone();
    next.bonus_months = months;
    next.performance_bonus = round_currency(record.base_monthly * months);
    next
}

/// Bonus months as shown on screen: one decimal place. The record keeps the
/// full-precision value.
pub fn bonus_months_display(record: &CompensationRecord) -> Months {
    record
        .bonus_months
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
