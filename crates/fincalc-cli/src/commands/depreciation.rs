use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::depreciation::schedule::{self, DepreciationInput, DepreciationMethod};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    StraightLine,
    DecliningBalance,
    SumOfYears,
}

impl From<MethodArg> for DepreciationMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::StraightLine => DepreciationMethod::StraightLine,
            MethodArg::DecliningBalance => DepreciationMethod::DecliningBalance,
            MethodArg::SumOfYears => DepreciationMethod::SumOfYearsDigits,
        }
    }
}

/// Arguments for a depreciation schedule
#[derive(Args)]
pub struct DepreciationArgs {
    /// Depreciation method
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Asset cost
    #[arg(long)]
    pub asset_cost: Option<Decimal>,

    /// Salvage value at end of life
    #[arg(long)]
    pub salvage_value: Option<Decimal>,

    /// Useful life in years
    #[arg(long, alias = "life")]
    pub useful_life_years: Option<u32>,

    /// Declining balance factor (2 = double-declining)
    #[arg(long, alias = "factor")]
    pub declining_factor: Option<Decimal>,

    /// Round schedule values to whole currency units
    #[arg(long)]
    pub whole_units: bool,

    /// Months in service during the first year (enables partial first year)
    #[arg(long)]
    pub first_year_months: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dep_input: DepreciationInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = DepreciationInput::default();
            DepreciationInput {
                method: args.method.map(Into::into).unwrap_or(d.method),
                asset_cost: args.asset_cost.unwrap_or(d.asset_cost),
                salvage_value: args.salvage_value.unwrap_or(d.salvage_value),
                useful_life_years: args.useful_life_years.unwrap_or(d.useful_life_years),
                declining_factor: args.declining_factor.unwrap_or(d.declining_factor),
                round_to_whole_units: args.whole_units,
                partial_first_year: args.first_year_months.is_some(),
                months_in_first_year: args.first_year_months.unwrap_or(d.months_in_first_year),
            }
        }
    };

    let result = schedule::calculate_depreciation(&dep_input);
    if result.result.schedule.is_empty() {
        return Err(
            "asset cost must be positive, life at least one year and salvage below cost".into(),
        );
    }
    Ok(serde_json::to_value(result)?)
}
