use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::bonus;
use crate::types::{round_currency, Money, Months};

/// Vesting period assumed when none (or a non-positive one) is entered.
pub const DEFAULT_VESTING_YEARS: Decimal = dec!(4);

const DEFAULT_MONTHS: Months = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One party's pay structure: the candidate's current job, the prospective
/// offer, or a competing offer.
///
/// Every numeric field deserializes leniently and a missing or unparseable
/// value is zero. A loaded record has `stock_value` re-derived from its grant
/// inputs, the same as after an edit. [`Default`] is the blank form instead:
/// 12 months and a 4-year vesting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordRepr")]
pub struct CompensationRecord {
    /// Monthly base salary
    pub base_monthly: Money,
    /// Months of base salary paid per year (13th/14th month conventions)
    pub months: Months,
    /// Monthly allowance, annualised over 12 months
    pub fixed_allowance: Money,
    /// Bonus as a multiple of `base_monthly`
    pub bonus_months: Months,
    /// Annual performance bonus
    pub performance_bonus: Money,
    pub sign_on_bonus: Money,
    pub other: Money,
    /// Annualised equity value, derived from the grant inputs when present
    pub stock_value: Money,
    pub stock_count: Decimal,
    pub strike_price: Money,
    pub grant_price: Money,
    pub vesting_years: Decimal,
}

#[derive(Deserialize)]
struct RecordRepr {
    #[serde(default, with = "crate::types::lenient")]
    base_monthly: Money,
    #[serde(default, with = "crate::types::lenient")]
    months: Months,
    #[serde(default, with = "crate::types::lenient")]
    fixed_allowance: Money,
    #[serde(default, with = "crate::types::lenient")]
    bonus_months: Months,
    #[serde(default, with = "crate::types::lenient")]
    performance_bonus: Money,
    #[serde(default, with = "crate::types::lenient")]
    sign_on_bonus: Money,
    #[serde(default, with = "crate::types::lenient")]
    other: Money,
    #[serde(default, with = "crate::types::lenient")]
    stock_value: Money,
    #[serde(default, with = "crate::types::lenient")]
    stock_count: Decimal,
    #[serde(default, with = "crate::types::lenient")]
    strike_price: Money,
    #[serde(default, with = "crate::types::lenient")]
    grant_price: Money,
    #[serde(default, with = "crate::types::lenient")]
    vesting_years: Decimal,
}

impl From<RecordRepr> for CompensationRecord {
    fn from(repr: RecordRepr) -> Self {
        CompensationRecord {
            base_monthly: repr.base_monthly,
            months: repr.months,
            fixed_allowance: repr.fixed_allowance,
            bonus_months: repr.bonus_months,
            performance_bonus: repr.performance_bonus,
            sign_on_bonus: repr.sign_on_bonus,
            other: repr.other,
            stock_value: repr.stock_value,
            stock_count: repr.stock_count,
            strike_price: repr.strike_price,
            grant_price: repr.grant_price,
            vesting_years: repr.vesting_years,
        }
        .with_refreshed_stock_value()
    }
}

impl Default for CompensationRecord {
    fn default() -> Self {
        Self {
            base_monthly: Decimal::ZERO,
            months: DEFAULT_MONTHS,
            fixed_allowance: Decimal::ZERO,
            bonus_months: Decimal::ZERO,
            performance_bonus: Decimal::ZERO,
            sign_on_bonus: Decimal::ZERO,
            other: Decimal::ZERO,
            stock_value: Decimal::ZERO,
            stock_count: Decimal::ZERO,
            strike_price: Decimal::ZERO,
            grant_price: Decimal::ZERO,
            vesting_years: DEFAULT_VESTING_YEARS,
        }
    }
}

/// Editable fields of a [`CompensationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    BaseMonthly,
    Months,
    FixedAllowance,
    BonusMonths,
    PerformanceBonus,
    SignOnBonus,
    Other,
    StockValue,
    StockCount,
    StrikePrice,
    GrantPrice,
    VestingYears,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordField::BaseMonthly => write!(f, "Base monthly"),
            RecordField::Months => write!(f, "Months"),
            RecordField::FixedAllowance => write!(f, "Allowance"),
            RecordField::BonusMonths => write!(f, "Bonus months"),
            RecordField::PerformanceBonus => write!(f, "Bonus"),
            RecordField::SignOnBonus => write!(f, "Sign-on"),
            RecordField::Other => write!(f, "Other"),
            RecordField::StockValue => write!(f, "Stock (annual)"),
            RecordField::StockCount => write!(f, "Stock count"),
            RecordField::StrikePrice => write!(f, "Strike price"),
            RecordField::GrantPrice => write!(f, "Grant price"),
            RecordField::VestingYears => write!(f, "Vesting years"),
        }
    }
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

impl CompensationRecord {
    /// Annualised equity value implied by the grant inputs.
    ///
    /// `round(stock_count * (grant_price - strike_price) / vesting_years)`,
    /// defined only when both `stock_count` and `grant_price` are positive.
    /// Otherwise `stock_value` is an independently entered figure and `None`
    /// is returned.
    pub fn derived_stock_value(&self) -> Option<Money> {
        if self.stock_count <= Decimal::ZERO || self.grant_price <= Decimal::ZERO {
            return None;
        }
        let years = if self.vesting_years > Decimal::ZERO {
            self.vesting_years
        } else {
            DEFAULT_VESTING_YEARS
        };
        let total_value = self.stock_count * (self.grant_price - self.strike_price);
        Some(round_currency(total_value / years))
    }

    /// Copy of the record with `stock_value` re-derived from the grant inputs
    /// (unchanged when the inputs do not define a value).
    pub fn with_refreshed_stock_value(&self) -> Self {
        let mut next = self.clone();
        if let Some(value) = self.derived_stock_value() {
            next.stock_value = value;
        }
        next
    }

    /// Read a field by name.
    pub fn field(&self, field: RecordField) -> Decimal {
        match field {
            RecordField::BaseMonthly => self.base_monthly,
            RecordField::Months => self.months,
            RecordField::FixedAllowance => self.fixed_allowance,
            RecordField::BonusMonths => self.bonus_months,
            RecordField::PerformanceBonus => self.performance_bonus,
            RecordField::SignOnBonus => self.sign_on_bonus,
            RecordField::Other => self.other,
            RecordField::StockValue => self.stock_value,
            RecordField::StockCount => self.stock_count,
            RecordField::StrikePrice => self.strike_price,
            RecordField::GrantPrice => self.grant_price,
            RecordField::VestingYears => self.vesting_years,
        }
    }

    /// Copy of the record after a single user edit.
    ///
    /// Editing the bonus amount or bonus months routes through the bonus
    /// reconciler; editing any grant input re-derives `stock_value`. Editing
    /// `base_monthly` leaves an existing bonus pair untouched and editing
    /// `stock_value` never back-fills the grant inputs.
    pub fn with_field(&self, field: RecordField, value: Decimal) -> Self {
        let mut next = self.clone();
        let refresh_equity = match field {
            RecordField::PerformanceBonus => return bonus::set_bonus_amount(self, value),
            RecordField::BonusMonths => return bonus::set_bonus_months(self, value),
            RecordField::BaseMonthly => {
                next.base_monthly = value;
                false
            }
            RecordField::Months => {
                next.months = value;
                false
            }
            RecordField::FixedAllowance => {
                next.fixed_allowance = value;
                false
            }
            RecordField::SignOnBonus => {
                next.sign_on_bonus = value;
                false
            }
            RecordField::Other => {
                next.other = value;
                false
            }
            RecordField::StockValue => {
                next.stock_value = value;
                false
            }
            RecordField::StockCount => {
                next.stock_count = value;
                true
            }
            RecordField::StrikePrice => {
                next.strike_price = value;
                true
            }
            RecordField::GrantPrice => {
                next.grant_price = value;
                true
            }
            RecordField::VestingYears => {
                next.vesting_years = value;
                true
            }
        };

        if refresh_equity {
            next.with_refreshed_stock_value()
        } else {
            next
        }
    }
}
