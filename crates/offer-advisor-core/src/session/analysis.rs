use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::SessionState;
use crate::advisory::{advise_full, recommend, Advisory, Suggestion};
use crate::compensation::{aggregate, bonus_months_display, IncreaseStats, PackageAggregate};
use crate::competitors::{benchmark, CompetitorBenchmark};
use crate::income::{
    deductions, estimate_pre_tax, flat_tax_rate, reconcile_bank_flows, DeductionBreakdown,
    FlowReconciliation, FlowStats, FlowType,
};
use crate::types::{with_metadata, ComputationOutput, Money, Months, Rate};

/// Everything derived from one session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferAnalysis {
    pub current: PackageAggregate,
    pub offer: PackageAggregate,
    pub increase: IncreaseStats,
    pub current_bonus_months: Months,
    pub offer_bonus_months: Months,
    pub benchmark: CompetitorBenchmark,
    pub suggestion: Suggestion,
    pub deductions: DeductionBreakdown,
    pub flow_stats: FlowStats,
    /// Flat rate used by the quick pre-tax estimate
    pub flat_tax_rate: Rate,
    /// Quick pre-tax monthly estimate from the average flow
    pub flat_estimate: Money,
    /// Month-by-month reconciliation through the bisection solver
    pub reconciliation: FlowReconciliation,
    pub advisories: Vec<Advisory>,
}

/// Recompute every figure for `state`: aggregates, then the competitor
/// benchmark, the recommendation, and finally the advisories.
pub fn analyze(state: &SessionState) -> OfferAnalysis {
    let current = aggregate(&state.current);
    let offer = aggregate(&state.offer);
    let bench = benchmark(&state.competitors);
    let suggestion = recommend(&current, &bench, &state.offer, &state.current, &state.params);

    let flow_stats = state.bank_flows.stats();
    let (rate, flat_estimate) = match state.bank_flows.flow_type() {
        FlowType::Net => (
            flat_tax_rate(flow_stats.average),
            estimate_pre_tax(flow_stats.average, &state.social_security),
        ),
        FlowType::Gross => (Decimal::ZERO, flow_stats.average),
    };
    let reconciliation = reconcile_bank_flows(
        &state.bank_flows,
        &state.social_security,
        &state.tax_table,
        &state.current,
    );

    let advisories = advise_full(
        &current,
        &offer,
        &state.current,
        &state.offer,
        &bench,
        &suggestion,
        flat_estimate,
    );

    debug!(
        competitors = state.competitors.len(),
        advisories = advisories.len(),
        total_target = %suggestion.total,
        "session analysis"
    );

    OfferAnalysis {
        increase: IncreaseStats::between(&current, &offer),
        current,
        offer,
        current_bonus_months: bonus_months_display(&state.current),
        offer_bonus_months: bonus_months_display(&state.offer),
        benchmark: bench,
        suggestion,
        deductions: deductions(&state.social_security),
        flow_stats,
        flat_tax_rate: rate,
        flat_estimate,
        reconciliation,
        advisories,
    }
}

/// [`analyze`] wrapped in the computation envelope, with soft input problems
/// listed as warnings.
pub fn analyze_offer(state: &SessionState) -> ComputationOutput<OfferAnalysis> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = &state.params;
    if params.stock_ratio < Decimal::ZERO || params.stock_ratio > Decimal::ONE {
        warnings.push(format!(
            "Stock ratio {} is outside [0, 1]; the cash part of the target is distorted",
            params.stock_ratio
        ));
    }
    if params.target_increase_pct < Decimal::ZERO {
        warnings.push(format!(
            "Target increase {} is negative; the target is below the current package",
            params.target_increase_pct
        ));
    }

    let analysis = analyze(state);

    if analysis.current.total_package.is_zero() {
        warnings.push("Current package is zero; increase figures are reported as 0".into());
    }
    if state.offer.months.is_zero() {
        warnings.push(format!(
            "Offer months is zero; suggested base spread over {} months",
            analysis.suggestion.months
        ));
    }
    if analysis.reconciliation.unconverged_months > 0 {
        warnings.push(format!(
            "{} bank-flow month(s) did not converge to a gross within tolerance",
            analysis.reconciliation.unconverged_months
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Package aggregation, competitor benchmark, target recommendation and rule-based risk review",
        &serde_json::json!({
            "params": params,
            "social_security": state.social_security,
            "flow_type": state.bank_flows.flow_type(),
            "competitors": state.competitors.len(),
        }),
        warnings,
        elapsed,
        analysis,
    )
}
