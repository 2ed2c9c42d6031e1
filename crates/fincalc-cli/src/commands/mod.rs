pub mod auto_finance;
pub mod defaults;
pub mod depreciation;
pub mod fixed_income;
pub mod housing;
pub mod wealth;

use fincalc_core::Outcome;
use serde::Serialize;
use serde_json::Value;

/// Turn a calculator outcome into printable JSON, or an error for the exit path.
pub fn outcome_to_value<T: Serialize>(outcome: Outcome<T>) -> Result<Value, Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Ok(output) => Ok(serde_json::to_value(output)?),
        Outcome::Invalid => Err("inputs are out of range; no result produced".into()),
        Outcome::Error { message } => Err(message.into()),
    }
}
