use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use offer_advisor_core::compensation::CompensationRecord;
use offer_advisor_core::competitors::CompetitorSet;
use offer_advisor_core::income::{BankFlowSeries, SocialSecurityProfile, TaxTable};
use offer_advisor_core::session::{SessionEdit, SessionState};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Deserialize)]
struct RecommendInput {
    current: CompensationRecord,
    offer: CompensationRecord,
    #[serde(default)]
    competitors: CompetitorSet,
    #[serde(default)]
    params: offer_advisor_core::advisory::AdviseParams,
}

#[derive(Deserialize)]
struct GrossFromNetInput {
    #[serde(with = "offer_advisor_core::types::lenient")]
    net: Decimal,
    #[serde(default)]
    profile: SocialSecurityProfile,
    #[serde(default)]
    tax_table: TaxTable,
}

#[derive(Deserialize)]
struct FlatEstimateInput {
    #[serde(with = "offer_advisor_core::types::lenient")]
    average: Decimal,
    #[serde(default)]
    profile: SocialSecurityProfile,
}

#[derive(Deserialize)]
struct ReconcileInput {
    flows: BankFlowSeries,
    #[serde(default)]
    profile: SocialSecurityProfile,
    #[serde(default)]
    tax_table: TaxTable,
    #[serde(default)]
    declared: CompensationRecord,
}

#[derive(Deserialize)]
struct EditInput {
    #[serde(default)]
    state: SessionState,
    edit: SessionEdit,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_offer(state_json: String) -> NapiResult<String> {
    let state: SessionState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    let output = offer_advisor_core::session::analyze_offer(&state);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn apply_session_edit(input_json: String) -> NapiResult<String> {
    let input: EditInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let next =
        offer_advisor_core::session::apply(&input.state, input.edit).map_err(to_napi_error)?;
    serde_json::to_string(&next).map_err(to_napi_error)
}

#[napi]
pub fn build_report(state_json: String) -> NapiResult<String> {
    let state: SessionState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    let analysis = offer_advisor_core::session::analyze(&state);
    let report = offer_advisor_core::report::OfferReport::build(&state, &analysis);
    serde_json::to_string(&report).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Compensation
// ---------------------------------------------------------------------------

#[napi]
pub fn aggregate_package(record_json: String) -> NapiResult<String> {
    let record: CompensationRecord = serde_json::from_str(&record_json).map_err(to_napi_error)?;
    let output = offer_advisor_core::compensation::aggregate(&record);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn benchmark_competitors(competitors_json: String) -> NapiResult<String> {
    let competitors: CompetitorSet =
        serde_json::from_str(&competitors_json).map_err(to_napi_error)?;
    let output = offer_advisor_core::competitors::benchmark(&competitors);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn recommend_offer(input_json: String) -> NapiResult<String> {
    let input: RecommendInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let current = offer_advisor_core::compensation::aggregate(&input.current);
    let bench = offer_advisor_core::competitors::benchmark(&input.competitors);
    let output = offer_advisor_core::advisory::recommend(
        &current,
        &bench,
        &input.offer,
        &input.current,
        &input.params,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Income
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_gross_from_net(input_json: String) -> NapiResult<String> {
    let input: GrossFromNetInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = offer_advisor_core::income::solve_gross_from_net_traced(
        input.net,
        &input.profile,
        &input.tax_table,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn estimate_pre_tax(input_json: String) -> NapiResult<String> {
    let input: FlatEstimateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = serde_json::json!({
        "average": input.average,
        "flat_tax_rate": offer_advisor_core::income::flat_tax_rate(input.average),
        "pre_tax_estimate": offer_advisor_core::income::estimate_pre_tax(input.average, &input.profile),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn reconcile_bank_flows(input_json: String) -> NapiResult<String> {
    let input: ReconcileInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = offer_advisor_core::income::reconcile_bank_flows(
        &input.flows,
        &input.profile,
        &input.tax_table,
        &input.declared,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}
