use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::wealth::college::{self, CollegeCostInput};
use fincalc_core::wealth::compound_interest::{
    self, CompoundInterestInput, CompoundingFrequency,
};

use super::outcome_to_value;
use crate::input;

/// Arguments for the college cost projection
#[derive(Args)]
pub struct CollegeArgs {
    /// Today's annual cost of attendance
    #[arg(long)]
    pub current_annual_cost: Option<Decimal>,

    /// College cost inflation in percent
    #[arg(long)]
    pub inflation_rate: Option<Decimal>,

    /// Years of college
    #[arg(long)]
    pub duration_years: Option<i32>,

    /// Share of total cost to fund from savings, in percent
    #[arg(long)]
    pub savings_percent_goal: Option<Decimal>,

    /// Savings already set aside
    #[arg(long)]
    pub current_savings: Option<Decimal>,

    /// Expected investment return in percent
    #[arg(long)]
    pub investment_return_rate: Option<Decimal>,

    /// Tax rate on investment gains in percent
    #[arg(long)]
    pub tax_rate_on_gains: Option<Decimal>,

    /// Years until the first year of college
    #[arg(long)]
    pub years_until_college: Option<i32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompoundingArg {
    Daily,
    Monthly,
    Quarterly,
    Semiannually,
    Annually,
}

impl From<CompoundingArg> for CompoundingFrequency {
    fn from(c: CompoundingArg) -> Self {
        match c {
            CompoundingArg::Daily => CompoundingFrequency::Daily,
            CompoundingArg::Monthly => CompoundingFrequency::Monthly,
            CompoundingArg::Quarterly => CompoundingFrequency::Quarterly,
            CompoundingArg::Semiannually => CompoundingFrequency::Semiannually,
            CompoundingArg::Annually => CompoundingFrequency::Annually,
        }
    }
}

/// Arguments for the compound interest projection
#[derive(Args)]
pub struct CompoundArgs {
    /// Starting balance
    #[arg(long)]
    pub initial_investment: Option<Decimal>,

    /// Contribution made once a year
    #[arg(long)]
    pub annual_contribution: Option<Decimal>,

    /// Contribution made every month
    #[arg(long)]
    pub monthly_contribution: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_interest_rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long, alias = "years")]
    pub investment_length_years: Option<u32>,

    /// Compounding frequency
    #[arg(long, value_enum)]
    pub compounding: Option<CompoundingArg>,

    /// Tax rate on growth in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Inflation in percent
    #[arg(long)]
    pub inflation_rate: Option<Decimal>,

    /// Annual growth of contributions in percent
    #[arg(long)]
    pub contribution_growth_rate: Option<Decimal>,

    /// Tax growth once at the end instead of yearly
    #[arg(long)]
    pub tax_deferred: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_college(args: CollegeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let college_input: CollegeCostInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = CollegeCostInput::default();
            CollegeCostInput {
                current_annual_cost: args.current_annual_cost.unwrap_or(d.current_annual_cost),
                inflation_rate: args.inflation_rate.unwrap_or(d.inflation_rate),
                duration_years: args.duration_years.unwrap_or(d.duration_years),
                savings_percent_goal: args.savings_percent_goal.unwrap_or(d.savings_percent_goal),
                current_savings: args.current_savings.unwrap_or(d.current_savings),
                investment_return_rate: args
                    .investment_return_rate
                    .unwrap_or(d.investment_return_rate),
                tax_rate_on_gains: args.tax_rate_on_gains.unwrap_or(d.tax_rate_on_gains),
                years_until_college: args.years_until_college.unwrap_or(d.years_until_college),
            }
        }
    };
    outcome_to_value(college::project_college_cost(&college_input))
}

pub fn run_compound_interest(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ci_input: CompoundInterestInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = CompoundInterestInput::default();
            CompoundInterestInput {
                initial_investment: args.initial_investment.unwrap_or(d.initial_investment),
                annual_contribution: args.annual_contribution.unwrap_or(d.annual_contribution),
                monthly_contribution: args.monthly_contribution.unwrap_or(d.monthly_contribution),
                annual_interest_rate: args.annual_interest_rate.unwrap_or(d.annual_interest_rate),
                investment_length_years: args
                    .investment_length_years
                    .unwrap_or(d.investment_length_years),
                compounding_frequency: args
                    .compounding
                    .map(Into::into)
                    .unwrap_or(d.compounding_frequency),
                tax_rate: args.tax_rate.unwrap_or(d.tax_rate),
                inflation_rate: args.inflation_rate.unwrap_or(d.inflation_rate),
                contribution_growth_rate: args
                    .contribution_growth_rate
                    .unwrap_or(d.contribution_growth_rate),
                tax_deferred: args.tax_deferred,
            }
        }
    };
    outcome_to_value(compound_interest::project_compound_interest(&ci_input))
}
