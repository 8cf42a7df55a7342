mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;

use commands::analysis::{AnalyzeArgs, RecommendArgs, ReportArgs};
use commands::compensation::{BenchmarkArgs, PackageArgs};
use commands::income::{FlatEstimateArgs, GrossFromNetArgs, ReconcileFlowsArgs};

/// Offer packaging and risk review
#[derive(Parser)]
#[command(
    name = "offer-advisor",
    version,
    about = "Offer packaging, gross-from-net estimation and offer risk review",
    long_about = "A CLI for comparing a candidate's current compensation with a prospective \
                  offer and competing offers, with decimal precision. Aggregates packages, \
                  recommends a target offer, reviews it against risk rules and recovers \
                  pre-tax income from bank flows."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis for a session: packages, benchmark, target, advisories
    Analyze(AnalyzeArgs),
    /// Aggregate one compensation record into package totals
    Package(PackageArgs),
    /// Find the strongest competing offer
    Benchmark(BenchmarkArgs),
    /// Recommend a target offer structure
    Recommend(RecommendArgs),
    /// Estimate monthly gross from monthly net (bisection over the tax table)
    GrossFromNet(GrossFromNetArgs),
    /// Quick flat-rate pre-tax estimate from an average monthly flow
    FlatEstimate(FlatEstimateArgs),
    /// Reconcile twelve months of bank flow against the declared pay structure
    ReconcileFlows(ReconcileFlowsArgs),
    /// Build the current-vs-offer comparison report
    Report(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args),
        Commands::Package(args) => commands::compensation::run_package(args),
        Commands::Benchmark(args) => commands::compensation::run_benchmark(args),
        Commands::Recommend(args) => commands::analysis::run_recommend(args),
        Commands::GrossFromNet(args) => commands::income::run_gross_from_net(args),
        Commands::FlatEstimate(args) => commands::income::run_flat_estimate(args),
        Commands::ReconcileFlows(args) => commands::income::run_reconcile_flows(args),
        Commands::Report(args) => commands::analysis::run_report(args),
        Commands::Version => {
            println!("offer-advisor {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
