//! Auto lease payment calculator.
//!
//! Splits the monthly payment into its three standard components: the
//! depreciation charge (capitalized cost down to residual, spread over the
//! term), the rent charge (money factor applied to capitalized cost plus
//! residual) and sales tax on both.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent};

/// Multiplying a money factor by this gives the approximate APR in percent.
const MONEY_FACTOR_TO_APR: Decimal = dec!(2400);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for an auto lease quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseInput {
    /// Negotiated vehicle price
    #[serde(default)]
    pub auto_price: Money,
    /// Lease term in months
    #[serde(default)]
    pub lease_term_months: u32,
    /// Money factor as a plain decimal (e.g. 0.00208), not a percentage
    #[serde(default)]
    pub money_factor: Decimal,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    /// Sales tax in percent units
    #[serde(default)]
    pub sales_tax: Percent,
    /// Contractual vehicle value at lease end
    #[serde(default)]
    pub residual_value: Money,
}

impl Default for LeaseInput {
    fn default() -> Self {
        Self {
            auto_price: dec!(50_000),
            lease_term_months: 36,
            money_factor: dec!(0.00208),
            down_payment: dec!(10_000),
            trade_in_value: Decimal::ZERO,
            sales_tax: dec!(7),
            residual_value: dec!(24_000),
        }
    }
}

/// Lease payment breakdown and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaseOutput {
    pub capitalized_cost: Money,
    pub depreciation: Money,
    pub monthly_depreciation: Money,
    pub monthly_interest: Money,
    pub monthly_tax: Money,
    pub monthly_payment: Money,
    pub total_lease_payments: Money,
    pub upfront_cost: Money,
    pub total_cost: Money,
    /// Rent charge over the whole term
    pub total_interest: Money,
    /// Sales tax over the whole term
    pub total_tax: Money,
    /// Money factor expressed as an approximate APR (percent units)
    pub equivalent_apr: Percent,
    /// Residual as a share of the vehicle price (percent units)
    pub residual_percent: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the monthly lease payment and lease totals.
///
/// Returns [`Outcome::Invalid`] (no result, no message) when the price is not
/// positive, the term is zero, or the residual is negative.
pub fn calculate_lease(input: &LeaseInput) -> Outcome<ComputationOutput<LeaseOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.auto_price <= Decimal::ZERO
        || input.lease_term_months == 0
        || input.residual_value < Decimal::ZERO
    {
        tracing::debug!(
            auto_price = %input.auto_price,
            lease_term_months = input.lease_term_months,
            "lease inputs rejected"
        );
        return Outcome::Invalid;
    }

    let term = Decimal::from(input.lease_term_months);

    let capitalized_cost = input.auto_price - input.down_payment - input.trade_in_value;
    let depreciation = capitalized_cost - input.residual_value;
    let monthly_depreciation = depreciation / term;
    let monthly_interest = (capitalized_cost + input.residual_value) * input.money_factor;
    let monthly_tax = (monthly_depreciation + monthly_interest) * pct(input.sales_tax);
    let monthly_payment = monthly_depreciation + monthly_interest + monthly_tax;

    let total_lease_payments = monthly_payment * term;
    let upfront_cost = input.down_payment + input.trade_in_value;
    let total_cost = upfront_cost + total_lease_payments;

    if depreciation < Decimal::ZERO {
        warnings.push(
            "Residual value exceeds capitalized cost; depreciation charge is negative".into(),
        );
    }

    let output = LeaseOutput {
        capitalized_cost,
        depreciation,
        monthly_depreciation,
        monthly_interest,
        monthly_tax,
        monthly_payment,
        total_lease_payments,
        upfront_cost,
        total_cost,
        total_interest: monthly_interest * term,
        total_tax: monthly_tax * term,
        equivalent_apr: input.money_factor * MONEY_FACTOR_TO_APR,
        residual_percent: input.residual_value / input.auto_price * Decimal::ONE_HUNDRED,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Outcome::Ok(with_metadata(
        "Auto lease — depreciation + rent charge (money factor) + sales tax",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
