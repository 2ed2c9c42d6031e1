//! Compound interest projection with contributions, taxes and inflation.
//!
//! The summary and annual schedule follow one loop: each year's contribution
//! is deposited first, then the balance compounds at the chosen frequency,
//! then (unless tax-deferred) the year's growth is taxed. The monthly
//! schedule is a separate loop that only uses the monthly contribution and
//! always compounds monthly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::{annualized_growth, compound_factor, power};
use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent, Rate};
use crate::FinCalcResult;

/// Longest horizon projected; the monthly schedule holds twelve rows per year.
pub const MAX_INVESTMENT_YEARS: u32 = 1_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Daily,
    #[default]
    Monthly,
    Quarterly,
    Semiannually,
    Annually,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Daily => 365,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Semiannually => 2,
            CompoundingFrequency::Annually => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    #[serde(default)]
    pub initial_investment: Money,
    #[serde(default)]
    pub annual_contribution: Money,
    #[serde(default)]
    pub monthly_contribution: Money,
    #[serde(default)]
    pub annual_interest_rate: Percent,
    #[serde(default)]
    pub investment_length_years: u32,
    #[serde(default)]
    pub compounding_frequency: CompoundingFrequency,
    /// Tax on growth, in percent units
    #[serde(default)]
    pub tax_rate: Percent,
    #[serde(default)]
    pub inflation_rate: Percent,
    /// Yearly growth applied to the combined annual + monthly contribution
    #[serde(default)]
    pub contribution_growth_rate: Percent,
    /// Tax growth once at the end instead of every year
    #[serde(default)]
    pub tax_deferred: bool,
}

impl Default for CompoundInterestInput {
    fn default() -> Self {
        Self {
            initial_investment: dec!(10_000),
            annual_contribution: Decimal::ZERO,
            monthly_contribution: dec!(500),
            annual_interest_rate: dec!(7),
            investment_length_years: 20,
            compounding_frequency: CompoundingFrequency::Monthly,
            tax_rate: Decimal::ZERO,
            inflation_rate: dec!(3),
            contribution_growth_rate: Decimal::ZERO,
            tax_deferred: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualRow {
    pub year: u32,
    pub contribution: Money,
    pub interest_earned: Money,
    pub tax_paid: Money,
    pub balance: Money,
    pub total_contributions: Money,
    pub inflation_adjusted_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub month: u32,
    pub contribution: Money,
    pub interest_earned: Money,
    pub tax_paid: Money,
    pub balance: Money,
    pub inflation_adjusted_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub final_amount: Money,
    /// Initial investment plus every contribution
    pub total_contributions: Money,
    /// Gross growth before tax
    pub total_interest_earned: Money,
    pub total_taxes_paid: Money,
    pub after_tax_amount: Money,
    pub inflation_adjusted_amount: Money,
    /// Geometric mean growth of contributions to the inflation-adjusted amount (percent units)
    pub real_return: Percent,
    /// Geometric mean growth of contributions to the final amount (percent units)
    pub effective_annual_rate: Percent,
    pub average_annual_growth: Money,
    pub annual_schedule: Vec<AnnualRow>,
    pub monthly_schedule: Vec<MonthlyRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project an investment's growth year by year and month by month.
///
/// Returns [`Outcome::Invalid`] for a zero-length horizon and
/// [`Outcome::Error`] if the horizon exceeds [`MAX_INVESTMENT_YEARS`] or the
/// projection overflows.
pub fn project_compound_interest(
    input: &CompoundInterestInput,
) -> Outcome<ComputationOutput<CompoundInterestOutput>> {
    let start = Instant::now();

    if input.investment_length_years == 0 {
        return Outcome::Invalid;
    }
    if input.investment_length_years > MAX_INVESTMENT_YEARS {
        return Outcome::error(format!(
            "Investment length cannot exceed {MAX_INVESTMENT_YEARS} years"
        ));
    }

    let mut warnings: Vec<String> = Vec::new();
    if input.annual_contribution > Decimal::ZERO {
        warnings.push(
            "Monthly schedule includes only the monthly contribution, compounded monthly".into(),
        );
    }

    match project(input) {
        Ok(output) => {
            let elapsed = start.elapsed().as_micros() as u64;
            Outcome::Ok(with_metadata(
                "Compound interest — start-of-year deposits, periodic compounding, annual or deferred tax",
                input,
                warnings,
                elapsed,
                output,
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "compound interest projection failed");
            Outcome::error(format!("Unable to calculate: {e}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

struct AnnualProjection {
    rows: Vec<AnnualRow>,
    final_amount: Money,
    total_contributions: Money,
    total_interest: Money,
    total_annual_tax: Money,
}

fn project(input: &CompoundInterestInput) -> FinCalcResult<CompoundInterestOutput> {
    let years = input.investment_length_years;
    let tax_rate = pct(input.tax_rate);
    let inflation = pct(input.inflation_rate);

    let annual = annual_projection(input)?;

    let (total_taxes_paid, after_tax_amount) = if input.tax_deferred {
        let taxable_gain = (annual.final_amount - annual.total_contributions).max(Decimal::ZERO);
        let tax = mul(taxable_gain, tax_rate, "deferred tax")?;
        (tax, annual.final_amount - tax)
    } else {
        (annual.total_annual_tax, annual.final_amount)
    };

    let inflation_adjusted_amount = div(
        after_tax_amount,
        compound_factor(inflation, years)?,
        "inflation adjustment",
    )?;
    let real_return =
        annualized_growth(annual.total_contributions, inflation_adjusted_amount, years)?;
    let effective_annual_rate =
        annualized_growth(annual.total_contributions, annual.final_amount, years)?;

    let monthly_schedule = monthly_schedule(input)?;
    tracing::debug!(
        annual_rows = annual.rows.len(),
        monthly_rows = monthly_schedule.len(),
        "compound interest schedules built"
    );

    Ok(CompoundInterestOutput {
        final_amount: annual.final_amount,
        total_contributions: annual.total_contributions,
        total_interest_earned: annual.total_interest,
        total_taxes_paid,
        after_tax_amount,
        inflation_adjusted_amount,
        real_return: mul(real_return, Decimal::ONE_HUNDRED, "real return")?,
        effective_annual_rate: mul(effective_annual_rate, Decimal::ONE_HUNDRED, "effective rate")?,
        average_annual_growth: annual.total_interest / Decimal::from(years),
        annual_schedule: annual.rows,
        monthly_schedule,
    })
}

fn annual_projection(input: &CompoundInterestInput) -> FinCalcResult<AnnualProjection> {
    let n = input.compounding_frequency.periods_per_year();
    let periodic_rate: Rate = pct(input.annual_interest_rate) / Decimal::from(n);
    let year_growth = compound_factor(periodic_rate, n)?;
    let tax_rate = pct(input.tax_rate);
    let contribution_growth = pct(input.contribution_growth_rate);
    let inflation = pct(input.inflation_rate);
    let base_contribution = add(
        input.annual_contribution,
        mul(input.monthly_contribution, dec!(12), "yearly contribution")?,
        "yearly contribution",
    )?;

    let mut balance = input.initial_investment;
    let mut total_contributions = input.initial_investment;
    let mut total_interest = Decimal::ZERO;
    let mut total_annual_tax = Decimal::ZERO;
    let mut rows = Vec::with_capacity(input.investment_length_years as usize);

    for year in 1..=input.investment_length_years {
        let growth = compound_factor(contribution_growth, year - 1)?;
        let contribution = mul(base_contribution, growth, "contribution")?;
        balance = add(balance, contribution, "balance")?;
        total_contributions = add(total_contributions, contribution, "total contributions")?;

        let grown = mul(balance, year_growth, "balance growth")?;
        let interest_earned = grown - balance;
        balance = grown;
        total_interest = add(total_interest, interest_earned, "total interest")?;

        let tax_paid = if input.tax_deferred {
            Decimal::ZERO
        } else {
            mul(interest_earned, tax_rate, "tax on growth")?
        };
        balance -= tax_paid;
        total_annual_tax += tax_paid;

        let deflator = compound_factor(inflation, year)?;
        rows.push(AnnualRow {
            year,
            contribution,
            interest_earned,
            tax_paid,
            balance,
            total_contributions,
            inflation_adjusted_balance: div(balance, deflator, "inflation adjustment")?,
        });
    }

    Ok(AnnualProjection {
        rows,
        final_amount: balance,
        total_contributions,
        total_interest,
        total_annual_tax,
    })
}

/// Month-by-month balance using the monthly contribution only, compounded at
/// `annual_rate / 12` regardless of the configured frequency.
fn monthly_schedule(input: &CompoundInterestInput) -> FinCalcResult<Vec<MonthlyRow>> {
    let months = input
        .investment_length_years
        .checked_mul(12)
        .ok_or_else(|| FinCalcError::Overflow {
            context: "month count".into(),
        })?;
    let monthly_rate: Rate = pct(input.annual_interest_rate) / dec!(12);
    let tax_rate = pct(input.tax_rate);
    let contribution_growth = pct(input.contribution_growth_rate);
    let inflation_base = Decimal::ONE + pct(input.inflation_rate);

    let mut balance = input.initial_investment;
    let mut rows = Vec::with_capacity(months as usize);

    for month in 1..=months {
        let year_index = (month - 1) / 12;
        let growth = compound_factor(contribution_growth, year_index)?;
        let contribution = mul(input.monthly_contribution, growth, "monthly contribution")?;
        balance = add(balance, contribution, "balance")?;

        let interest_earned = mul(balance, monthly_rate, "monthly interest")?;
        balance = add(balance, interest_earned, "balance")?;

        let tax_paid = if input.tax_deferred {
            Decimal::ZERO
        } else {
            mul(interest_earned, tax_rate, "tax on growth")?
        };
        balance -= tax_paid;

        let deflator = power(inflation_base, Decimal::from(month) / dec!(12))?;
        rows.push(MonthlyRow {
            month,
            contribution,
            interest_earned,
            tax_paid,
            balance,
            inflation_adjusted_balance: div(balance, deflator, "inflation adjustment")?,
        });
    }

    Ok(rows)
}

fn add(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_add(b).ok_or_else(|| FinCalcError::Overflow {
        context: context.into(),
    })
}

fn mul(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| FinCalcError::Overflow {
        context: context.into(),
    })
}

fn div(a: Decimal, b: Decimal, context: &str) -> FinCalcResult<Decimal> {
    a.checked_div(b).ok_or_else(|| FinCalcError::Overflow {
        context: context.into(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
