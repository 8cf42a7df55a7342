use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compensation::{CompensationRecord, PackageAggregate, RecordField};
use crate::competitors::CompetitorBenchmark;
use crate::types::{ratio_or_zero, round_to_step, Money, Months, Rate};

/// Suggested figures are copied onto the offer rounded to this step.
pub const SUGGESTION_STEP: Decimal = dec!(100);

const FALLBACK_MONTHS: Decimal = dec!(12);
const ALLOWANCE_MONTHS: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tunable advisory parameters. Any subset may be supplied; the rest take
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviseParams {
    /// Minimum raise over the current total package (0.30 = 30%)
    #[serde(with = "crate::types::lenient")]
    pub target_increase_pct: Rate,
    /// Share of the target package paid in equity
    #[serde(with = "crate::types::lenient")]
    pub stock_ratio: Rate,
    /// Premium over the strongest competing package
    #[serde(with = "crate::types::lenient")]
    pub beat_competitor_premium_pct: Rate,
}

impl Default for AdviseParams {
    fn default() -> Self {
        Self {
            target_increase_pct: dec!(0.30),
            stock_ratio: dec!(0.15),
            beat_competitor_premium_pct: dec!(0.05),
        }
    }
}

/// Recommended offer structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Final target total package
    pub total: Money,
    /// Equity part of the target
    pub stock: Money,
    /// Suggested monthly base, never negative
    pub base_monthly: Money,
    /// Cash part of the target
    pub cash_total: Money,
    pub is_based_on_competitor: bool,
    pub target_from_current: Money,
    pub target_from_competitor: Money,
    /// Months the cash part was spread over
    pub months: Months,
}

/// Offer fields a suggestion can be copied onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedField {
    BaseMonthly,
    StockValue,
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Target the larger of a raise over the current package and a premium over
/// the strongest competitor, split it into equity and cash, and back-solve
/// the monthly base from the offer's other cash components.
///
/// The months divisor is the first non-zero of the offer's months, the
/// current record's months, and 12.
pub fn recommend(
    current_aggregate: &PackageAggregate,
    benchmark: &CompetitorBenchmark,
    offer: &CompensationRecord,
    current: &CompensationRecord,
    params: &AdviseParams,
) -> Suggestion {
    let target_from_current =
        current_aggregate.total_package * (Decimal::ONE + params.target_increase_pct);
    let target_from_competitor = if benchmark.max_package > Decimal::ZERO {
        benchmark.max_package * (Decimal::ONE + params.beat_competitor_premium_pct)
    } else {
        Decimal::ZERO
    };

    let is_based_on_competitor = target_from_competitor > target_from_current;
    let total = target_from_current.max(target_from_competitor);
    let stock = total * params.stock_ratio;
    let cash_total = total - stock;

    let months = [offer.months, current.months]
        .into_iter()
        .find(|m| !m.is_zero())
        .unwrap_or(FALLBACK_MONTHS);

    let non_base_cash = offer.performance_bonus
        + offer.sign_on_bonus
        + offer.fixed_allowance * ALLOWANCE_MONTHS
        + offer.other;
    let base_monthly = ratio_or_zero(cash_total - non_base_cash, months).max(Decimal::ZERO);

    debug!(
        total = %total,
        is_based_on_competitor,
        base_monthly = %base_monthly,
        "offer recommendation"
    );

    Suggestion {
        total,
        stock,
        base_monthly,
        cash_total,
        is_based_on_competitor,
        target_from_current,
        target_from_competitor,
        months,
    }
}

/// Copy a suggested figure onto the offer, rounded to the nearest 100.
///
/// Applying the stock figure sets `stock_value` directly; the grant inputs
/// are left as they are.
pub fn apply_suggestion(
    offer: &CompensationRecord,
    suggestion: &Suggestion,
    field: SuggestedField,
) -> CompensationRecord {
    match field {
        SuggestedField::BaseMonthly => offer.with_field(
            RecordField::BaseMonthly,
            round_to_step(suggestion.base_monthly, SUGGESTION_STEP),
        ),
        SuggestedField::StockValue => offer.with_field(
            RecordField::StockValue,
            round_to_step(suggestion.stock, SUGGESTION_STEP),
        ),
    }
}
