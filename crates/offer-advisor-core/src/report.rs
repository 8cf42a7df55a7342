//! Figures for the exported offer report. Nothing here computes: every
//! number comes from an [`OfferAnalysis`] or the session records and is only
//! formatted, with the same rounding as the on-screen figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::advisory::Advisory;
pub use crate::format::{format_currency, format_delta, format_percent};
use crate::session::{CandidateProfile, OfferAnalysis, SessionState};
use crate::types::Rate;

/// Percentage precision used by [`OfferReport::build`].
pub const DEFAULT_PERCENT_DECIMALS: u32 = 1;

const NO_ADVISORIES: &str = "No notable risks; the package structure is sound.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowUnit {
    Currency,
    Months,
}

/// One line of the current-vs-offer comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub unit: RowUnit,
    pub current: Decimal,
    pub offer: Decimal,
    pub delta: Decimal,
    /// `delta / current`; absent when either is zero
    pub delta_pct: Option<Rate>,
    pub current_display: String,
    pub offer_display: String,
    pub delta_display: String,
    pub delta_pct_display: String,
}

impl ComparisonRow {
    fn new(label: &str, unit: RowUnit, current: Decimal, offer: Decimal, decimals: u32) -> Self {
        let delta = offer - current;
        let delta_pct = if current.is_zero() || delta.is_zero() {
            None
        } else {
            Some(delta / current)
        };
        let (current_display, offer_display, delta_display) = match unit {
            RowUnit::Currency => (
                format_currency(current),
                format_currency(offer),
                format_delta(delta),
            ),
            RowUnit::Months => (
                current.normalize().to_string(),
                offer.normalize().to_string(),
                format_months_delta(delta),
            ),
        };

        Self {
            label: label.to_string(),
            unit,
            current,
            offer,
            delta,
            delta_pct,
            current_display,
            offer_display,
            delta_display,
            delta_pct_display: delta_pct
                .map(|pct| format_percent(pct, decimals))
                .unwrap_or_default(),
        }
    }
}

fn format_months_delta(delta: Decimal) -> String {
    if delta.is_zero() {
        "-".to_string()
    } else if delta > Decimal::ZERO {
        format!("+{}", delta.normalize())
    } else {
        delta.normalize().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSummary {
    pub total: String,
    pub base_monthly: String,
    pub stock: String,
    pub cash_total: String,
    pub basis: String,
}

/// Static comparison document for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferReport {
    pub candidate: CandidateProfile,
    pub rows: Vec<ComparisonRow>,
    pub cash_increase: String,
    pub total_increase: String,
    pub monthly_increase: String,
    pub suggestion: SuggestionSummary,
    pub advisories: Vec<Advisory>,
    /// Advisory messages, or a single all-clear line when there are none
    pub advisory_lines: Vec<String>,
}

impl OfferReport {
    pub fn build(state: &SessionState, analysis: &OfferAnalysis) -> Self {
        Self::build_with_precision(state, analysis, DEFAULT_PERCENT_DECIMALS)
    }

    pub fn build_with_precision(
        state: &SessionState,
        analysis: &OfferAnalysis,
        percent_decimals: u32,
    ) -> Self {
        let cur = &state.current;
        let off = &state.offer;
        let d = percent_decimals;

        let rows = vec![
            ComparisonRow::new(
                "Base monthly",
                RowUnit::Currency,
                cur.base_monthly,
                off.base_monthly,
                d,
            ),
            ComparisonRow::new("Months", RowUnit::Months, cur.months, off.months, d),
            ComparisonRow::new(
                "Allowance (monthly)",
                RowUnit::Currency,
                cur.fixed_allowance,
                off.fixed_allowance,
                d,
            ),
            ComparisonRow::new(
                "Performance bonus",
                RowUnit::Currency,
                cur.performance_bonus,
                off.performance_bonus,
                d,
            ),
            ComparisonRow::new(
                "Sign-on bonus",
                RowUnit::Currency,
                cur.sign_on_bonus,
                off.sign_on_bonus,
                d,
            ),
            ComparisonRow::new(
                "Stock (annual)",
                RowUnit::Currency,
                cur.stock_value,
                off.stock_value,
                d,
            ),
            ComparisonRow::new(
                "Cash total",
                RowUnit::Currency,
                analysis.current.cash_total,
                analysis.offer.cash_total,
                d,
            ),
            ComparisonRow::new(
                "Total package",
                RowUnit::Currency,
                analysis.current.total_package,
                analysis.offer.total_package,
                d,
            ),
        ];

        let suggestion = &analysis.suggestion;
        let basis = match (
            suggestion.is_based_on_competitor,
            analysis.benchmark.max_competitor_name.as_deref(),
        ) {
            (true, Some(name)) => format!(
                "Beat {name} by {}",
                format_percent(state.params.beat_competitor_premium_pct, d)
            ),
            _ => format!(
                "Raise current package by {}",
                format_percent(state.params.target_increase_pct, d)
            ),
        };

        let advisory_lines = if analysis.advisories.is_empty() {
            vec![NO_ADVISORIES.to_string()]
        } else {
            analysis
                .advisories
                .iter()
                .map(|a| format!("[{}] {}", a.severity, a.message))
                .collect()
        };

        Self {
            candidate: state.candidate.clone(),
            rows,
            cash_increase: format_percent(analysis.increase.cash_increase_pct, d),
            total_increase: format_percent(analysis.increase.total_increase_pct, d),
            monthly_increase: format_percent(analysis.increase.monthly_increase_pct, d),
            suggestion: SuggestionSummary {
                total: format_currency(suggestion.total),
                base_monthly: format_currency(suggestion.base_monthly),
                stock: format_currency(suggestion.stock),
                cash_total: format_currency(suggestion.cash_total),
                basis,
            },
            advisories: analysis.advisories.clone(),
            advisory_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compensation::CompensationRecord;
    use crate::session::analyze;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn row<'a>(report: &'a OfferReport, label: &str) -> &'a ComparisonRow {
        report.rows.iter().find(|r| r.label == label).unwrap()
    }

    #[test]
    fn test_default_session_report() {
        let state = SessionState::default();
        let report = OfferReport::build(&state, &analyze(&state));

        assert_eq!(report.rows.len(), 8);
        let base = row(&report, "Base monthly");
        assert_eq!(base.current_display, "¥16,672");
        assert_eq!(base.offer_display, "¥20,000");
        assert_eq!(base.delta_display, "+¥3,328");
        assert_eq!(base.delta_pct_display, "20.0%");

        let months = row(&report, "Months");
        assert_eq!(months.current_display, "13");
        assert_eq!(months.delta_display, "+1");

        let stock = row(&report, "Stock (annual)");
        assert_eq!(stock.delta_display, "-");
        assert_eq!(stock.delta_pct, None);

        assert_eq!(row(&report, "Cash total").offer_display, "¥340,000");
        assert_eq!(report.suggestion.total, "¥301,725");
        assert_eq!(report.suggestion.basis, "Raise current package by 30.0%");
        assert_eq!(report.advisory_lines.len(), 1);
        assert!(report.advisory_lines[0].starts_with("[good]"));
    }

    #[test]
    fn test_empty_advisories_all_clear_line() {
        let state = SessionState {
            offer: CompensationRecord {
                base_monthly: dec!(18500),
                months: dec!(13),
                performance_bonus: dec!(15360),
                ..Default::default()
            },
            ..Default::default()
        };
        let analysis = analyze(&state);
        assert!(analysis.advisories.is_empty());
        let report = OfferReport::build(&state, &analysis);
        assert_eq!(report.advisory_lines, vec![NO_ADVISORIES.to_string()]);
    }

    #[test]
    fn test_percent_precision() {
        let state = SessionState::default();
        let report = OfferReport::build_with_precision(&state, &analyze(&state), 0);
        assert_eq!(row(&report, "Base monthly").delta_pct_display, "20%");
    }
}
