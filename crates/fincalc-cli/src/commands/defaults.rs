use clap::{Args, ValueEnum};
use serde_json::Value;

use fincalc_core::auto_finance::cash_back::CashBackInput;
use fincalc_core::auto_finance::lease::LeaseInput;
use fincalc_core::depreciation::schedule::DepreciationInput;
use fincalc_core::fixed_income::accrued::AccruedInterestInput;
use fincalc_core::fixed_income::bonds::BondInput;
use fincalc_core::housing::affordability::AffordabilityInput;
use fincalc_core::wealth::college::CollegeCostInput;
use fincalc_core::wealth::compound_interest::CompoundInterestInput;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Calculator {
    Lease,
    Bond,
    AccruedInterest,
    CashBack,
    College,
    Depreciation,
    HouseAffordability,
    CompoundInterest,
}

/// Arguments for printing a calculator's default input record
#[derive(Args)]
pub struct DefaultsArgs {
    /// Calculator whose reset-to-defaults input should be printed
    #[arg(value_enum)]
    pub calculator: Calculator,
}

/// Print the default input record as JSON, ready to edit and pass back via `--input`.
pub fn run_defaults(args: DefaultsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = match args.calculator {
        Calculator::Lease => serde_json::to_value(LeaseInput::default())?,
        Calculator::Bond => serde_json::to_value(BondInput::default())?,
        Calculator::AccruedInterest => serde_json::to_value(AccruedInterestInput::default())?,
        Calculator::CashBack => serde_json::to_value(CashBackInput::default())?,
        Calculator::College => serde_json::to_value(CollegeCostInput::default())?,
        Calculator::Depreciation => serde_json::to_value(DepreciationInput::default())?,
        Calculator::HouseAffordability => serde_json::to_value(AffordabilityInput::default())?,
        Calculator::CompoundInterest => serde_json::to_value(CompoundInterestInput::default())?,
    };
    Ok(value)
}
