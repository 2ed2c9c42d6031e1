//! How much house can I afford?
//!
//! Finds the home price whose full monthly housing cost matches a ceiling,
//! either derived from income and debt-to-income limits or given directly as a
//! monthly budget. The search is a fixed proportional update: each step moves
//! the price by `gap * 100` until the monthly gap is under 10.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::amortizing_payment;
use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Search constants
// ---------------------------------------------------------------------------

const SEED_PRICE: Money = dec!(100_000);
const STEP_MULTIPLIER: Decimal = dec!(100);
const GAP_TOLERANCE: Money = dec!(10);
const MAX_ITERATIONS: u32 = 100;
/// Down payments below this share of the price carry PMI.
const PMI_THRESHOLD: Percent = dec!(20);
const MONTHS_PER_YEAR: Decimal = dec!(12);
/// Longest mortgage term accepted.
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Mortgage program, which fixes the debt-to-income ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanProgram {
    /// 28% front-end / 36% back-end
    #[default]
    Conventional,
    /// 31% / 43%
    Fha,
    /// No front-end limit / 41%
    Va,
    /// The same percentage for both limits
    Custom(Percent),
}

impl LoanProgram {
    /// `(front_end, back_end)` limits in percent units. `None` means no
    /// front-end limit applies.
    pub fn dti_limits(self) -> (Option<Percent>, Percent) {
        match self {
            LoanProgram::Conventional => (Some(dec!(28)), dec!(36)),
            LoanProgram::Fha => (Some(dec!(31)), dec!(43)),
            LoanProgram::Va => (None, dec!(41)),
            LoanProgram::Custom(ratio) => (Some(ratio), ratio),
        }
    }
}

/// Where the monthly ceiling comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AffordabilityMode {
    Income {
        #[serde(default)]
        annual_income: Money,
        #[serde(default)]
        monthly_debts: Money,
        #[serde(default)]
        loan_program: LoanProgram,
    },
    Budget {
        #[serde(default)]
        monthly_budget: Money,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub mode: AffordabilityMode,
    /// Annual mortgage rate (percent units)
    #[serde(default)]
    pub interest_rate: Percent,
    #[serde(default)]
    pub loan_term_years: u32,
    #[serde(default)]
    pub down_payment_percent: Percent,
    /// Annual property tax as a percent of price
    #[serde(default)]
    pub property_tax_rate: Percent,
    /// Annual homeowners insurance as a percent of price
    #[serde(default)]
    pub insurance_rate: Percent,
    #[serde(default)]
    pub hoa_monthly: Money,
    /// Annual PMI as a percent of the loan amount
    #[serde(default)]
    pub pmi_rate: Percent,
    /// Annual maintenance as a percent of price (budget mode only)
    #[serde(default)]
    pub maintenance_rate: Percent,
}

impl Default for AffordabilityInput {
    fn default() -> Self {
        Self {
            mode: AffordabilityMode::Income {
                annual_income: dec!(100_000),
                monthly_debts: dec!(500),
                loan_program: LoanProgram::Conventional,
            },
            interest_rate: dec!(6.5),
            loan_term_years: 30,
            down_payment_percent: dec!(20),
            property_tax_rate: dec!(1.2),
            insurance_rate: dec!(0.5),
            hoa_monthly: Decimal::ZERO,
            pmi_rate: dec!(0.5),
            maintenance_rate: dec!(1),
        }
    }
}

/// Full monthly cost of owning at a given price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCostBreakdown {
    pub principal_and_interest: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub pmi: Money,
    pub maintenance: Money,
    pub total: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_home_price: Money,
    pub down_payment_amount: Money,
    pub loan_amount: Money,
    pub monthly_costs: MonthlyCostBreakdown,
    /// The monthly ceiling the search targeted
    pub max_monthly_payment: Money,
    /// Realised housing cost / gross monthly income (income mode, percent units)
    pub front_end_ratio: Option<Percent>,
    /// Realised housing cost plus debts / gross monthly income (income mode)
    pub back_end_ratio: Option<Percent>,
    pub front_end_limit: Option<Percent>,
    pub back_end_limit: Option<Percent>,
    pub iterations: u32,
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Maximum affordable home price for the given income or budget.
///
/// Returns [`Outcome::Invalid`] when the loan term is zero or longer than
/// [`MAX_LOAN_TERM_YEARS`]. A search that drives the price to zero or below
/// yields an all-zero result.
pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> Outcome<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.loan_term_years == 0 || input.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Outcome::Invalid;
    }

    let output = match search(input, &mut warnings) {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(error = %e, "affordability search failed");
            return Outcome::Invalid;
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Outcome::Ok(with_metadata(
        "House affordability — proportional price search against a monthly housing ceiling",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Monthly cost of owning a home at `price`.
pub fn monthly_cost(input: &AffordabilityInput, price: Money) -> FinCalcResult<MonthlyCostBreakdown> {
    let down_payment = price * pct(input.down_payment_percent);
    let loan_amount = price - down_payment;
    let monthly_rate = pct(input.interest_rate) / MONTHS_PER_YEAR;
    let months = input
        .loan_term_years
        .checked_mul(12)
        .ok_or_else(|| FinCalcError::Overflow {
            context: format!("{}-year loan term in months", input.loan_term_years),
        })?;
    let principal_and_interest = amortizing_payment(loan_amount, monthly_rate, months)?;

    let property_tax = price * pct(input.property_tax_rate) / MONTHS_PER_YEAR;
    let insurance = price * pct(input.insurance_rate) / MONTHS_PER_YEAR;
    let pmi = if input.down_payment_percent < PMI_THRESHOLD {
        loan_amount * pct(input.pmi_rate) / MONTHS_PER_YEAR
    } else {
        Decimal::ZERO
    };
    let maintenance = match input.mode {
        AffordabilityMode::Budget { .. } => price * pct(input.maintenance_rate) / MONTHS_PER_YEAR,
        AffordabilityMode::Income { .. } => Decimal::ZERO,
    };

    let total =
        principal_and_interest + property_tax + insurance + input.hoa_monthly + pmi + maintenance;

    Ok(MonthlyCostBreakdown {
        principal_and_interest,
        property_tax,
        insurance,
        hoa: input.hoa_monthly,
        pmi,
        maintenance,
        total,
    })
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

struct Ceiling {
    amount: Money,
    monthly_income: Option<Money>,
    monthly_debts: Money,
    front_end_limit: Option<Percent>,
    back_end_limit: Option<Percent>,
}

fn ceiling(mode: &AffordabilityMode) -> Ceiling {
    match *mode {
        AffordabilityMode::Income {
            annual_income,
            monthly_debts,
            loan_program,
        } => {
            let monthly_income = annual_income / MONTHS_PER_YEAR;
            let (front, back) = loan_program.dti_limits();
            let back_end_room = monthly_income * pct(back) - monthly_debts;
            let amount = match front {
                Some(front) => back_end_room.min(monthly_income * pct(front)),
                None => back_end_room,
            };
            Ceiling {
                amount,
                monthly_income: Some(monthly_income),
                monthly_debts,
                front_end_limit: front,
                back_end_limit: Some(back),
            }
        }
        AffordabilityMode::Budget { monthly_budget } => Ceiling {
            amount: monthly_budget,
            monthly_income: None,
            monthly_debts: Decimal::ZERO,
            front_end_limit: None,
            back_end_limit: None,
        },
    }
}

fn search(
    input: &AffordabilityInput,
    warnings: &mut Vec<String>,
) -> FinCalcResult<AffordabilityOutput> {
    let target = ceiling(&input.mode);
    let mut price = SEED_PRICE;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let gap = target.amount - monthly_cost(input, price)?.total;
        if gap.abs() < GAP_TOLERANCE {
            converged = true;
            break;
        }
        price += gap * STEP_MULTIPLIER;
        if price <= Decimal::ZERO {
            tracing::debug!(iterations, "price estimate went non-positive");
            warnings.push("No affordable home price for these inputs".into());
            return Ok(AffordabilityOutput {
                front_end_limit: target.front_end_limit,
                back_end_limit: target.back_end_limit,
                iterations,
                ..AffordabilityOutput::default()
            });
        }
    }

    if converged {
        tracing::debug!(iterations, price = %price, "affordability search converged");
    } else {
        tracing::warn!(
            iterations,
            "affordability search did not converge; returning last estimate"
        );
        warnings.push(format!(
            "Price search did not converge after {MAX_ITERATIONS} iterations; showing best estimate"
        ));
    }

    let monthly_costs = monthly_cost(input, price)?;
    let down_payment_amount = price * pct(input.down_payment_percent);

    let (front_end_ratio, back_end_ratio) = match target.monthly_income {
        Some(income) if income > Decimal::ZERO => (
            Some(monthly_costs.total / income * Decimal::ONE_HUNDRED),
            Some((monthly_costs.total + target.monthly_debts) / income * Decimal::ONE_HUNDRED),
        ),
        Some(_) => (Some(Decimal::ZERO), Some(Decimal::ZERO)),
        None => (None, None),
    };

    Ok(AffordabilityOutput {
        max_home_price: price,
        down_payment_amount,
        loan_amount: price - down_payment_amount,
        monthly_costs,
        max_monthly_payment: target.amount,
        front_end_ratio,
        back_end_ratio,
        front_end_limit: target.front_end_limit,
        back_end_limit: target.back_end_limit,
        iterations,
        converged,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
