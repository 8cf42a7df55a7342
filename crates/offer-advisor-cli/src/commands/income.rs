use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use offer_advisor_core::income::{
    estimate_pre_tax, flat_tax_rate, reconcile_bank_flows, solve_gross_from_net_traced,
    SocialSecurityProfile, TaxTable,
};
use offer_advisor_core::with_metadata;

use super::analysis::{load_session, ParamOverrides, SessionArgs};
use crate::input;

/// Social-security profile, from a file and/or individual flags
#[derive(Args)]
pub struct ProfileArgs {
    /// Path to a social-security profile (JSON/YAML); flags are applied on top
    #[arg(long)]
    pub profile: Option<String>,

    /// Contribution base for the employee deductions
    #[arg(long)]
    pub base_personal: Option<Decimal>,

    /// Pension rate (e.g. 0.08)
    #[arg(long)]
    pub pension_rate: Option<Decimal>,

    /// Medical insurance rate (e.g. 0.02)
    #[arg(long)]
    pub medical_rate: Option<Decimal>,

    /// Unemployment insurance rate (e.g. 0.005)
    #[arg(long)]
    pub unemployment_rate: Option<Decimal>,

    /// Housing fund rate (e.g. 0.07)
    #[arg(long)]
    pub housing_rate: Option<Decimal>,
}

impl ProfileArgs {
    fn resolve(&self) -> Result<SocialSecurityProfile, Box<dyn std::error::Error>> {
        let base: SocialSecurityProfile = match self.profile {
            Some(ref path) => input::file::read_document(path)?,
            None => SocialSecurityProfile::default(),
        };
        Ok(SocialSecurityProfile {
            base_personal: self.base_personal.unwrap_or(base.base_personal),
            pension_rate: self.pension_rate.unwrap_or(base.pension_rate),
            medical_rate: self.medical_rate.unwrap_or(base.medical_rate),
            unemployment_rate: self.unemployment_rate.unwrap_or(base.unemployment_rate),
            housing_rate: self.housing_rate.unwrap_or(base.housing_rate),
            ..base
        })
    }
}

/// Arguments for the gross-from-net solver
#[derive(Args)]
pub struct GrossFromNetArgs {
    /// Monthly net income (after tax and deductions)
    #[arg(long)]
    pub net: Option<Decimal>,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Path to a replacement tax table (JSON/YAML)
    #[arg(long)]
    pub tax_table: Option<String>,
}

/// Arguments for the flat-rate estimate
#[derive(Args)]
pub struct FlatEstimateArgs {
    /// Average monthly flow; when omitted the session's bank flows are used
    #[arg(long)]
    pub average: Option<Decimal>,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Path to a session document supplying bank flows and profile
    #[arg(long, conflicts_with = "average")]
    pub input: Option<String>,
}

/// Arguments for bank-flow reconciliation
#[derive(Args)]
pub struct ReconcileFlowsArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Deserialize)]
struct GrossFromNetInput {
    #[serde(with = "offer_advisor_core::types::lenient")]
    net: Decimal,
    #[serde(default)]
    profile: SocialSecurityProfile,
    #[serde(default)]
    tax_table: TaxTable,
}

#[derive(Debug, Serialize, Deserialize)]
struct FlatEstimateOutput {
    average_flow: Decimal,
    flat_tax_rate: Decimal,
    social_rate: Decimal,
    pre_tax_estimate: Decimal,
}

pub fn run_gross_from_net(args: GrossFromNetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let solver_input = match args.net {
        Some(net) => GrossFromNetInput {
            net,
            profile: args.profile.resolve()?,
            tax_table: match args.tax_table {
                Some(ref path) => input::file::read_document(path)?,
                None => TaxTable::default(),
            },
        },
        None => input::read_document(None)?
            .ok_or("--net is required (or pipe {\"net\": ...} on stdin)")?,
    };

    let trace = solve_gross_from_net_traced(
        solver_input.net,
        &solver_input.profile,
        &solver_input.tax_table,
    );

    let mut warnings = Vec::new();
    if !trace.bracketed {
        warnings.push(format!(
            "Net {} is not reachable from a gross in [net, 2 x net] under this profile; \
             estimate is the search boundary",
            solver_input.net
        ));
    } else if !trace.converged {
        warnings.push(format!(
            "Bisection stopped after {} iterations with residual {}",
            trace.iterations, trace.residual
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Bisection over [net, 2 x net], 20 iterations max, tolerance 1 currency unit",
        &serde_json::json!({
            "profile": solver_input.profile,
            "tax_table": solver_input.tax_table,
        }),
        warnings,
        elapsed,
        trace,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_flat_estimate(args: FlatEstimateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let (average, profile) = match args.average {
        Some(average) => (average, args.profile.resolve()?),
        None => {
            let state = load_session(&SessionArgs {
                input: args.input.clone(),
                edits: None,
                params: ParamOverrides::default(),
            })?;
            (state.bank_flows.stats().average, state.social_security)
        }
    };

    let mut warnings = Vec::new();
    if average.is_zero() {
        warnings.push("Average flow is zero; no estimate".to_string());
    }

    let output = FlatEstimateOutput {
        average_flow: average,
        flat_tax_rate: flat_tax_rate(average),
        social_rate: profile.combined_rate(),
        pre_tax_estimate: estimate_pre_tax(average, &profile),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "average / (1 - social rate - flat tax rate); quick reference only",
        &profile,
        warnings,
        elapsed,
        output,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_reconcile_flows(args: ReconcileFlowsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = load_session(&args.session)?;
    let reconciliation = reconcile_bank_flows(
        &state.bank_flows,
        &state.social_security,
        &state.tax_table,
        &state.current,
    );

    let mut warnings = Vec::new();
    if reconciliation.months_with_income == 0 {
        warnings.push("No month has a positive flow".to_string());
    }
    if reconciliation.unconverged_months > 0 {
        warnings.push(format!(
            "{} month(s) did not converge to a gross within tolerance",
            reconciliation.unconverged_months
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Per-month gross (bisection for net flows), annual gross vs declared base, allowance and bonus",
        &serde_json::json!({
            "flow_type": state.bank_flows.flow_type(),
            "declared": state.current,
        }),
        warnings,
        elapsed,
        reconciliation,
    );
    Ok(serde_json::to_value(result)?)
}
