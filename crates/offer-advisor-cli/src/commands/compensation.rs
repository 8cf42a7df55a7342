use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use offer_advisor_core::compensation::{
    aggregate, bonus_months_display, CompensationRecord, PackageAggregate, RecordField,
};
use offer_advisor_core::competitors::{benchmark, CompetitorSet};
use offer_advisor_core::with_metadata;

use crate::input;

/// Arguments for package aggregation
#[derive(Args)]
pub struct PackageArgs {
    /// Path to a compensation record (JSON/YAML); flags are applied on top
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly base salary
    #[arg(long)]
    pub base_monthly: Option<Decimal>,

    /// Months of base paid per year
    #[arg(long)]
    pub months: Option<Decimal>,

    /// Monthly fixed allowance
    #[arg(long)]
    pub allowance: Option<Decimal>,

    /// Annual performance bonus amount
    #[arg(long, conflicts_with = "bonus_months")]
    pub bonus: Option<Decimal>,

    /// Performance bonus as a multiple of base
    #[arg(long)]
    pub bonus_months: Option<Decimal>,

    /// One-time sign-on bonus
    #[arg(long)]
    pub sign_on: Option<Decimal>,

    /// Other annual cash
    #[arg(long)]
    pub other: Option<Decimal>,

    /// Annualised stock value (ignored when grant inputs derive it)
    #[arg(long)]
    pub stock_value: Option<Decimal>,

    /// Number of granted shares/options
    #[arg(long)]
    pub stock_count: Option<Decimal>,

    /// Strike (exercise) price per share
    #[arg(long)]
    pub strike_price: Option<Decimal>,

    /// Grant-date price per share
    #[arg(long)]
    pub grant_price: Option<Decimal>,

    /// Vesting period in years (default 4)
    #[arg(long)]
    pub vesting_years: Option<Decimal>,
}

/// Arguments for the competitor benchmark
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Path to a competitor list (JSON/YAML); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PackageOutput {
    record: CompensationRecord,
    aggregate: PackageAggregate,
    bonus_months_display: Decimal,
}

impl PackageArgs {
    /// Flag edits in the order a user fills the form: base first so the
    /// bonus pair derives from it, grant inputs last so they win over a typed
    /// stock value.
    fn edits(&self) -> Vec<(RecordField, Decimal)> {
        [
            (RecordField::BaseMonthly, self.base_monthly),
            (RecordField::Months, self.months),
            (RecordField::FixedAllowance, self.allowance),
            (RecordField::PerformanceBonus, self.bonus),
            (RecordField::BonusMonths, self.bonus_months),
            (RecordField::SignOnBonus, self.sign_on),
            (RecordField::Other, self.other),
            (RecordField::StockValue, self.stock_value),
            (RecordField::StockCount, self.stock_count),
            (RecordField::StrikePrice, self.strike_price),
            (RecordField::GrantPrice, self.grant_price),
            (RecordField::VestingYears, self.vesting_years),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

pub fn run_package(args: PackageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let from_input: Option<CompensationRecord> = input::read_document(args.input.as_deref())?;
    let edits = args.edits();
    if from_input.is_none() && edits.is_empty() {
        return Err("--base-monthly (or another field flag) is required (or provide --input)".into());
    }

    let record = edits
        .into_iter()
        .fold(from_input.unwrap_or_default(), |record, (field, value)| {
            record.with_field(field, value)
        })
        .with_refreshed_stock_value();

    let mut warnings = Vec::new();
    if record.months.is_zero() {
        warnings.push("Months is zero; base total is 0".to_string());
    }
    if record.stock_value > Decimal::ZERO && record.derived_stock_value().is_none() {
        warnings.push("Stock value entered directly; no grant inputs to derive it".to_string());
    }

    let output = PackageOutput {
        aggregate: aggregate(&record),
        bonus_months_display: bonus_months_display(&record),
        record,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Base x months + allowance x 12 + bonus + sign-on + other; plus annualised stock",
        &serde_json::json!({ "allowance_months": 12 }),
        warnings,
        elapsed,
        output,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let competitors: CompetitorSet = input::read_document(args.input.as_deref())?
        .ok_or("--input is required (or pipe a competitor list on stdin)")?;

    let mut warnings = Vec::new();
    if competitors.is_empty() {
        warnings.push("No competitors; maximum package is 0".to_string());
    }

    let bench = benchmark(&competitors);
    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Largest total package across competitors; first wins ties",
        &serde_json::json!({ "competitors": competitors.len() }),
        warnings,
        elapsed,
        bench,
    );
    Ok(serde_json::to_value(result)?)
}
