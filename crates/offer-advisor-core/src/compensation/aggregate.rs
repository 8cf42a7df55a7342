use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::record::CompensationRecord;
use crate::types::{ratio_or_zero, Money, Rate};

const ALLOWANCE_MONTHS: Decimal = dec!(12);

/// Annualised totals derived from one [`CompensationRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageAggregate {
    /// `base_monthly * months`
    pub base_total: Money,
    /// `fixed_allowance * 12`
    pub allowance_total: Money,
    /// Base, allowance, bonus, sign-on and other cash
    pub cash_total: Money,
    /// Cash plus annualised equity
    pub total_package: Money,
    /// `base_monthly + fixed_allowance`
    pub monthly_cash: Money,
}

/// Aggregate a record into package totals. Pure; never fails.
pub fn aggregate(record: &CompensationRecord) -> PackageAggregate {
    let base_total = record.base_monthly * record.months;
    let allowance_total = record.fixed_allowance * ALLOWANCE_MONTHS;
    let cash_total = base_total
        + allowance_total
        + record.performance_bonus
        + record.sign_on_bonus
        + record.other;

    PackageAggregate {
        base_total,
        allowance_total,
        cash_total,
        total_package: cash_total + record.stock_value,
        monthly_cash: record.base_monthly + record.fixed_allowance,
    }
}

/// Relative change from the current package to the offer. Each figure is
/// zero when the current-side denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncreaseStats {
    pub cash_increase_pct: Rate,
    pub total_increase_pct: Rate,
    pub monthly_increase_pct: Rate,
}

impl IncreaseStats {
    pub fn between(current: &PackageAggregate, offer: &PackageAggregate) -> Self {
        Self {
            cash_increase_pct: ratio_or_zero(
                offer.cash_total - current.cash_total,
                current.cash_total,
            ),
            total_increase_pct: ratio_or_zero(
                offer.total_package - current.total_package,
                current.total_package,
            ),
            monthly_increase_pct: ratio_or_zero(
                offer.monthly_cash - current.monthly_cash,
                current.monthly_cash,
            ),
        }
    }
}
