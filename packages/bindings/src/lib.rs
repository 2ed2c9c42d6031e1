use napi::Result as NapiResult;
use napi_derive::napi;

use fincalc_core::auto_finance::{cash_back, lease};
use fincalc_core::depreciation::schedule;
use fincalc_core::fixed_income::{accrued, bonds};
use fincalc_core::housing::affordability;
use fincalc_core::wealth::{college, compound_interest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// Outcomes serialize with a `status` tag ("ok", "invalid", "error"), so the
// JavaScript side sees the calculator's own failure signal rather than a throw.
// Only malformed JSON raises.

// ---------------------------------------------------------------------------
// Auto finance
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_lease(input_json: String) -> NapiResult<String> {
    let input: lease::LeaseInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lease::calculate_lease(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_cash_back(input_json: String) -> NapiResult<String> {
    let input: cash_back::CashBackInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cash_back::compare_offers(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fixed income
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_bond(input_json: String) -> NapiResult<String> {
    let input: bonds::BondInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bonds::calculate_bond(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_accrued_interest(input_json: String) -> NapiResult<String> {
    let input: accrued::AccruedInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = accrued::calculate_accrued_interest(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_depreciation(input_json: String) -> NapiResult<String> {
    let input: schedule::DepreciationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::calculate_depreciation(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Housing
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_affordability(input_json: String) -> NapiResult<String> {
    let input: affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = affordability::calculate_affordability(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Wealth
// ---------------------------------------------------------------------------

#[napi]
pub fn project_college_cost(input_json: String) -> NapiResult<String> {
    let input: college::CollegeCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = college::project_college_cost(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_compound_interest(input_json: String) -> NapiResult<String> {
    let input: compound_interest::CompoundInterestInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = compound_interest::project_compound_interest(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default input record for a calculator, as JSON.
#[napi]
pub fn default_input(calculator: String) -> NapiResult<String> {
    let value = match calculator.as_str() {
        "lease" => serde_json::to_string(&lease::LeaseInput::default()),
        "cash_back" => serde_json::to_string(&cash_back::CashBackInput::default()),
        "bond" => serde_json::to_string(&bonds::BondInput::default()),
        "accrued_interest" => serde_json::to_string(&accrued::AccruedInterestInput::default()),
        "depreciation" => serde_json::to_string(&schedule::DepreciationInput::default()),
        "house_affordability" => {
            serde_json::to_string(&affordability::AffordabilityInput::default())
        }
        "college" => serde_json::to_string(&college::CollegeCostInput::default()),
        "compound_interest" => {
            serde_json::to_string(&compound_interest::CompoundInterestInput::default())
        }
        other => return Err(to_napi_error(format!("unknown calculator: {other}"))),
    };
    value.map_err(to_napi_error)
}
