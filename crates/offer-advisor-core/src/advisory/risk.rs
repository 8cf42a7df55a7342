use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::recommend::Suggestion;
use crate::compensation::{CompensationRecord, IncreaseStats, PackageAggregate};
use crate::competitors::CompetitorBenchmark;
use crate::format::{format_currency, format_percent};
use crate::types::{ratio_or_zero, Money, Rate};

/// Cash raises below this are flagged.
pub const LOW_CASH_RAISE: Rate = dec!(0.10);
/// Equity share of the offer above this is flagged.
pub const EQUITY_CONCENTRATION: Rate = dec!(0.40);
/// Total raise needed for the balanced verdict.
pub const BALANCED_TOTAL_RAISE: Rate = dec!(0.15);
/// Flow-derived monthly gross above this multiple of current base is flagged.
pub const FLOW_ESTIMATE_MARGIN: Decimal = dec!(1.15);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Presentation severity; carries no numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Info,
    Good,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Danger => write!(f, "danger"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Good => write!(f, "good"),
        }
    }
}

/// Which rule produced an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCode {
    CompetitorBenchmarked,
    TrailsCompetitor,
    LowCashRaise,
    CashDecrease,
    EquityConcentration,
    MonthlyCashInversion,
    FlowEstimateHigh,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub severity: Severity,
    pub code: AdvisoryCode,
    pub message: String,
}

impl Advisory {
    fn new(severity: Severity, code: AdvisoryCode, message: String) -> Self {
        Self {
            severity,
            code,
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Evaluate the package rules in order. Every rule that trips adds one
/// advisory; the balanced verdict is only added when nothing else fired.
pub fn advise(
    current: &PackageAggregate,
    offer: &PackageAggregate,
    offer_record: &CompensationRecord,
    benchmark: &CompetitorBenchmark,
    suggestion: &Suggestion,
) -> Vec<Advisory> {
    let stats = IncreaseStats::between(current, offer);
    let mut advisories = package_rules(offer, offer_record, benchmark, suggestion, &stats);
    push_balanced_fallback(&mut advisories, &stats);
    advisories
}

/// [`advise`] plus the monthly cash inversion and bank-flow checks, which run
/// before the balanced verdict and therefore suppress it when they fire.
///
/// `flow_estimate` is the flat-rate pre-tax monthly estimate from bank flows;
/// zero disables that check.
pub fn advise_full(
    current: &PackageAggregate,
    offer: &PackageAggregate,
    current_record: &CompensationRecord,
    offer_record: &CompensationRecord,
    benchmark: &CompetitorBenchmark,
    suggestion: &Suggestion,
    flow_estimate: Money,
) -> Vec<Advisory> {
    let stats = IncreaseStats::between(current, offer);
    let mut advisories = package_rules(offer, offer_record, benchmark, suggestion, &stats);

    if current.monthly_cash > offer.monthly_cash {
        advisories.push(Advisory::new(
            Severity::Danger,
            AdvisoryCode::MonthlyCashInversion,
            format!(
                "Monthly cash inversion: offer pays {} per month against {} today",
                format_currency(offer.monthly_cash),
                format_currency(current.monthly_cash)
            ),
        ));
    }

    if flow_estimate > Decimal::ZERO
        && flow_estimate > current_record.base_monthly * FLOW_ESTIMATE_MARGIN
    {
        advisories.push(Advisory::new(
            Severity::Info,
            AdvisoryCode::FlowEstimateHigh,
            format!(
                "Bank flow implies a pre-tax monthly salary of {}, well above the declared base of {}; verify",
                format_currency(flow_estimate),
                format_currency(current_record.base_monthly)
            ),
        ));
    }

    push_balanced_fallback(&mut advisories, &stats);
    advisories
}

fn package_rules(
    offer: &PackageAggregate,
    offer_record: &CompensationRecord,
    benchmark: &CompetitorBenchmark,
    suggestion: &Suggestion,
    stats: &IncreaseStats,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if suggestion.is_based_on_competitor {
        let name = benchmark
            .max_competitor_name
            .as_deref()
            .unwrap_or("the strongest competitor");
        advisories.push(Advisory::new(
            Severity::Info,
            AdvisoryCode::CompetitorBenchmarked,
            format!(
                "Target benchmarked against {name} at {}",
                format_currency(benchmark.max_package)
            ),
        ));
    }

    if offer.total_package < benchmark.max_package {
        advisories.push(Advisory::new(
            Severity::Danger,
            AdvisoryCode::TrailsCompetitor,
            format!(
                "Offer trails the strongest competitor by {}",
                format_currency(benchmark.max_package - offer.total_package)
            ),
        ));
    }

    let cash = stats.cash_increase_pct;
    if cash >= Decimal::ZERO && cash < LOW_CASH_RAISE {
        advisories.push(Advisory::new(
            Severity::Warning,
            AdvisoryCode::LowCashRaise,
            format!(
                "Cash raise of {} is under 10%; the candidate may be reluctant to accept",
                format_percent(cash, 1)
            ),
        ));
    }

    if cash < Decimal::ZERO {
        advisories.push(Advisory::new(
            Severity::Danger,
            AdvisoryCode::CashDecrease,
            format!("Cash decreases by {}", format_percent(cash.abs(), 1)),
        ));
    }

    let equity_share = ratio_or_zero(offer_record.stock_value, offer.total_package);
    if equity_share > EQUITY_CONCENTRATION {
        advisories.push(Advisory::new(
            Severity::Warning,
            AdvisoryCode::EquityConcentration,
            format!(
                "Equity is {} of the package; value depends on the long term",
                format_percent(equity_share, 0)
            ),
        ));
    }

    advisories
}

fn push_balanced_fallback(advisories: &mut Vec<Advisory>, stats: &IncreaseStats) {
    if advisories.is_empty() && stats.total_increase_pct > BALANCED_TOTAL_RAISE {
        advisories.push(Advisory::new(
            Severity::Good,
            AdvisoryCode::Balanced,
            "Package is balanced; risk is under control".to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compensation::aggregate;

    fn current() -> CompensationRecord {
        CompensationRecord {
            base_monthly: dec!(16672),
            months: dec!(13),
            performance_bonus: dec!(15360),
            ..Default::default()
        }
    }

    fn offer() -> CompensationRecord {
        CompensationRecord {
            base_monthly: dec!(22000),
            months: dec!(14),
            performance_bonus: dec!(66000),
            stock_value: dec!(100000),
            ..Default::default()
        }
    }

    fn codes(advisories: &[Advisory]) -> Vec<AdvisoryCode> {
        advisories.iter().map(|a| a.code).collect()
    }

    fn run(current: &CompensationRecord, offer: &CompensationRecord) -> Vec<Advisory> {
        advise(
            &aggregate(current),
            &aggregate(offer),
            offer,
            &CompetitorBenchmark::default(),
            &Suggestion::default(),
        )
    }

    #[test]
    fn test_balanced_offer() {
        let advisories = run(&current(), &offer());
        assert_eq!(codes(&advisories), vec![AdvisoryCode::Balanced]);
        assert_eq!(advisories[0].severity, Severity::Good);
    }

    #[test]
    fn test_low_raise_warning() {
        let flat = CompensationRecord {
            base_monthly: dec!(17000),
            ..current()
        };
        let advisories = run(&current(), &flat);
        assert_eq!(codes(&advisories), vec![AdvisoryCode::LowCashRaise]);
        assert_eq!(advisories[0].severity, Severity::Warning);
    }

    #[test]
    fn test_cash_decrease_is_danger_only() {
        let worse = CompensationRecord {
            base_monthly: dec!(15000),
            ..current()
        };
        let advisories = run(&current(), &worse);
        assert_eq!(codes(&advisories), vec![AdvisoryCode::CashDecrease]);
        assert_eq!(advisories[0].severity, Severity::Danger);
    }

    #[test]
    fn test_equity_concentration() {
        let heavy = CompensationRecord {
            stock_value: dec!(400000),
            ..offer()
        };
        // 400000 / 774000 ~ 0.52
        assert_eq!(
            codes(&run(&current(), &heavy)),
            vec![AdvisoryCode::EquityConcentration]
        );
    }

    #[test]
    fn test_competitor_rules_fire_together() {
        let bench = CompetitorBenchmark {
            max_package: dec!(500000),
            max_competitor_id: Some(1),
            max_competitor_name: Some("Beta".into()),
            per_competitor: Vec::new(),
        };
        let suggestion = Suggestion {
            is_based_on_competitor: true,
            ..Default::default()
        };
        let advisories = advise(
            &aggregate(&current()),
            &aggregate(&offer()),
            &offer(),
            &bench,
            &suggestion,
        );
        assert_eq!(
            codes(&advisories),
            vec![AdvisoryCode::CompetitorBenchmarked, AdvisoryCode::TrailsCompetitor]
        );
        assert!(advisories[0].message.contains("Beta"));
        assert!(advisories[1].message.contains("¥26,000"));
    }

    #[test]
    fn test_no_fallback_for_small_total_raise() {
        let modest = CompensationRecord {
            base_monthly: dec!(18500),
            ..current()
        };
        // cash +10.3%, total +10.3%: nothing fires, not balanced either
        assert!(run(&current(), &modest).is_empty());
    }

    #[test]
    fn test_full_rules_flag_inversion_and_flow() {
        // Higher annual cash via months and bonus, lower monthly pay.
        let inverted = CompensationRecord {
            base_monthly: dec!(16000),
            months: dec!(16),
            performance_bonus: dec!(60000),
            ..Default::default()
        };
        let cur = current();
        let advisories = advise_full(
            &aggregate(&cur),
            &aggregate(&inverted),
            &cur,
            &inverted,
            &CompetitorBenchmark::default(),
            &Suggestion::default(),
            dec!(25000),
        );
        assert_eq!(
            codes(&advisories),
            vec![AdvisoryCode::MonthlyCashInversion, AdvisoryCode::FlowEstimateHigh]
        );
    }

    #[test]
    fn test_full_rules_keep_balanced_when_clean() {
        let cur = current();
        let advisories = advise_full(
            &aggregate(&cur),
            &aggregate(&offer()),
            &cur,
            &offer(),
            &CompetitorBenchmark::default(),
            &Suggestion::default(),
            Decimal::ZERO,
        );
        assert_eq!(codes(&advisories), vec![AdvisoryCode::Balanced]);
    }
}
