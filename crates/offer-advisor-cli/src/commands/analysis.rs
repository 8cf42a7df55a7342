use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use offer_advisor_core::advisory::AdviseParams;
use offer_advisor_core::report::{OfferReport, DEFAULT_PERCENT_DECIMALS};
use offer_advisor_core::session::{analyze, analyze_offer, apply, SessionEdit, SessionState};
use offer_advisor_core::with_metadata;

use crate::input;

/// Overrides for the advisory parameters of a session
#[derive(Args, Default)]
pub struct ParamOverrides {
    /// Minimum raise over the current total package (e.g. 0.30 for 30%)
    #[arg(long)]
    pub target_increase: Option<Decimal>,

    /// Share of the target package paid in equity (0 to 1)
    #[arg(long)]
    pub stock_ratio: Option<Decimal>,

    /// Premium over the strongest competing package (e.g. 0.05)
    #[arg(long)]
    pub competitor_premium: Option<Decimal>,
}

impl ParamOverrides {
    fn over(&self, params: AdviseParams) -> Option<AdviseParams> {
        if self.target_increase.is_none()
            && self.stock_ratio.is_none()
            && self.competitor_premium.is_none()
        {
            return None;
        }
        Some(AdviseParams {
            target_increase_pct: self.target_increase.unwrap_or(params.target_increase_pct),
            stock_ratio: self.stock_ratio.unwrap_or(params.stock_ratio),
            beat_competitor_premium_pct: self
                .competitor_premium
                .unwrap_or(params.beat_competitor_premium_pct),
        })
    }
}

/// Session source shared by the session-level commands
#[derive(Args)]
pub struct SessionArgs {
    /// Path to a session document (JSON, or YAML by extension); stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a list of session edits applied in order before running
    #[arg(long)]
    pub edits: Option<String>,

    #[command(flatten)]
    pub params: ParamOverrides,
}

/// Arguments for the full session analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the offer recommendation
#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the comparison report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Decimal places for percentages
    #[arg(long, default_value_t = DEFAULT_PERCENT_DECIMALS)]
    pub percent_decimals: u32,
}

/// Load the session (file, stdin or a fresh default), replay any edits and
/// apply parameter overrides, all through the session reducer.
pub fn load_session(args: &SessionArgs) -> Result<SessionState, Box<dyn std::error::Error>> {
    let mut state: SessionState =
        input::read_document(args.input.as_deref())?.unwrap_or_default();

    if let Some(ref path) = args.edits {
        let edits: Vec<SessionEdit> = input::file::read_document(path)?;
        for edit in edits {
            state = apply(&state, edit)?;
        }
    }

    if let Some(params) = args.params.over(state.params) {
        state = apply(&state, SessionEdit::SetParams { params })?;
    }

    Ok(state)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = load_session(&args.session)?;
    let result = analyze_offer(&state);
    Ok(serde_json::to_value(result)?)
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = load_session(&args.session)?;
    let analysis = analyze(&state);

    let mut warnings = Vec::new();
    if analysis.current.total_package.is_zero() {
        warnings.push("Current package is zero; target rests on competitors only".to_string());
    }
    if analysis.suggestion.base_monthly.is_zero() {
        warnings.push(
            "Offer's bonus, sign-on, allowance and other cash already exceed the cash target; \
             suggested base clamped to 0"
                .to_string(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Target = max(current x (1 + raise), strongest competitor x (1 + premium)), \
         split by stock ratio, base back-solved from remaining cash",
        &state.params,
        warnings,
        elapsed,
        analysis.suggestion,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let state = load_session(&args.session)?;
    let analysis = analyze(&state);
    let report = OfferReport::build_with_precision(&state, &analysis, args.percent_decimals);

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Current vs offer comparison; currency rounded to whole units",
        &serde_json::json!({ "percent_decimals": args.percent_decimals }),
        Vec::new(),
        elapsed,
        report,
    );
    Ok(serde_json::to_value(result)?)
}
