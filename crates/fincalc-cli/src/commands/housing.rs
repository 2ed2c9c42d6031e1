use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::housing::affordability::{
    self, AffordabilityInput, AffordabilityMode, LoanProgram,
};

use super::outcome_to_value;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgramArg {
    Conventional,
    Fha,
    Va,
    Custom,
}

/// Arguments for house affordability.
///
/// `--monthly-budget` switches to budget mode; otherwise income mode is used.
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Gross annual income (income mode)
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Other monthly debt payments (income mode)
    #[arg(long)]
    pub monthly_debts: Option<Decimal>,

    /// Loan program setting the DTI limits (income mode)
    #[arg(long, value_enum)]
    pub loan_program: Option<ProgramArg>,

    /// DTI limit in percent for the custom program (10-50)
    #[arg(long)]
    pub custom_ratio: Option<Decimal>,

    /// Fixed monthly housing budget (budget mode)
    #[arg(long)]
    pub monthly_budget: Option<Decimal>,

    /// Mortgage rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term_years: Option<u32>,

    /// Down payment in percent of price
    #[arg(long)]
    pub down_payment_percent: Option<Decimal>,

    /// Annual property tax in percent of price
    #[arg(long)]
    pub property_tax_rate: Option<Decimal>,

    /// Annual insurance in percent of price
    #[arg(long)]
    pub insurance_rate: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long)]
    pub hoa_monthly: Option<Decimal>,

    /// Annual PMI in percent of the loan
    #[arg(long)]
    pub pmi_rate: Option<Decimal>,

    /// Annual maintenance in percent of price (budget mode)
    #[arg(long)]
    pub maintenance_rate: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => build_from_flags(&args)?,
    };
    outcome_to_value(affordability::calculate_affordability(&afford_input))
}

fn build_from_flags(args: &AffordabilityArgs) -> Result<AffordabilityInput, Box<dyn std::error::Error>> {
    let d = AffordabilityInput::default();

    let mode = if let Some(monthly_budget) = args.monthly_budget {
        AffordabilityMode::Budget { monthly_budget }
    } else {
        let (default_income, default_debts, default_program) = match d.mode {
            AffordabilityMode::Income {
                annual_income,
                monthly_debts,
                loan_program,
            } => (annual_income, monthly_debts, loan_program),
            AffordabilityMode::Budget { .. } => (Decimal::ZERO, Decimal::ZERO, LoanProgram::default()),
        };
        let loan_program = match args.loan_program {
            None => default_program,
            Some(ProgramArg::Conventional) => LoanProgram::Conventional,
            Some(ProgramArg::Fha) => LoanProgram::Fha,
            Some(ProgramArg::Va) => LoanProgram::Va,
            Some(ProgramArg::Custom) => {
                let ratio = args
                    .custom_ratio
                    .ok_or("--custom-ratio is required with --loan-program custom")?;
                if ratio < Decimal::TEN || ratio > Decimal::from(50) {
                    return Err("--custom-ratio must be between 10 and 50".into());
                }
                LoanProgram::Custom(ratio)
            }
        };
        AffordabilityMode::Income {
            annual_income: args.annual_income.unwrap_or(default_income),
            monthly_debts: args.monthly_debts.unwrap_or(default_debts),
            loan_program,
        }
    };

    Ok(AffordabilityInput {
        mode,
        interest_rate: args.interest_rate.unwrap_or(d.interest_rate),
        loan_term_years: args.loan_term_years.unwrap_or(d.loan_term_years),
        down_payment_percent: args.down_payment_percent.unwrap_or(d.down_payment_percent),
        property_tax_rate: args.property_tax_rate.unwrap_or(d.property_tax_rate),
        insurance_rate: args.insurance_rate.unwrap_or(d.insurance_rate),
        hoa_monthly: args.hoa_monthly.unwrap_or(d.hoa_monthly),
        pmi_rate: args.pmi_rate.unwrap_or(d.pmi_rate),
        maintenance_rate: args.maintenance_rate.unwrap_or(d.maintenance_rate),
    })
}
