mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::prelude::*;

use commands::auto_finance::{CashBackArgs, LeaseArgs};
use commands::defaults::DefaultsArgs;
use commands::depreciation::DepreciationArgs;
use commands::fixed_income::{AccruedArgs, BondArgs};
use commands::housing::AffordabilityArgs;
use commands::wealth::{CollegeArgs, CompoundArgs};

/// Consumer financial calculators
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Consumer financial calculators",
    long_about = "A CLI for everyday financial calculations with decimal precision. \
                  Covers auto leases, cash back vs. low interest offers, bond pricing, \
                  depreciation schedules, house affordability, college savings and \
                  compound interest."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. warn, debug, fincalc_core=trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and totals for an auto lease
    Lease(LeaseArgs),
    /// Compare a cash back rebate against a low-interest offer
    CashBack(CashBackArgs),
    /// Bond price from yield, or yield to maturity from price
    Bond(BondArgs),
    /// Accrued interest with clean and dirty price
    AccruedInterest(AccruedArgs),
    /// Depreciation schedule (straight-line, declining balance, sum-of-years)
    Depreciation(DepreciationArgs),
    /// Maximum affordable home price from income or a monthly budget
    HouseAffordability(AffordabilityArgs),
    /// College cost projection and required monthly savings
    College(CollegeArgs),
    /// Compound interest growth with contributions, taxes and inflation
    CompoundInterest(CompoundArgs),
    /// Print a calculator's default input record as JSON
    Defaults(DefaultsArgs),
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

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Lease(args) => commands::auto_finance::run_lease(args),
        Commands::CashBack(args) => commands::auto_finance::run_cash_back(args),
        Commands::Bond(args) => commands::fixed_income::run_bond(args),
        Commands::AccruedInterest(args) => commands::fixed_income::run_accrued_interest(args),
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::HouseAffordability(args) => commands::housing::run_affordability(args),
        Commands::College(args) => commands::wealth::run_college(args),
        Commands::CompoundInterest(args) => commands::wealth::run_compound_interest(args),
        Commands::Defaults(args) => commands::defaults::run_defaults(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
