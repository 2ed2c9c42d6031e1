//! College cost projection: inflate today's cost of attendance to each
//! college year, grow current savings at the after-tax return, and size the
//! level monthly contribution that closes the gap by the first year.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::time_value::{compound_factor, fv_annuity, fv_annuity_payment};
use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent, Rate};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Upper bound on both the saving horizon and the length of college.
pub const MAX_PLAN_YEARS: i32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input parameters for a college savings plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeCostInput {
    /// Today's all-in annual cost of attendance
    #[serde(default)]
    pub current_annual_cost: Money,
    #[serde(default)]
    pub inflation_rate: Percent,
    #[serde(default)]
    pub duration_years: i32,
    /// Share of the total cost to cover from savings
    #[serde(default)]
    pub savings_percent_goal: Percent,
    #[serde(default)]
    pub current_savings: Money,
    #[serde(default)]
    pub investment_return_rate: Percent,
    #[serde(default)]
    pub tax_rate_on_gains: Percent,
    #[serde(default)]
    pub years_until_college: i32,
}

impl Default for CollegeCostInput {
    fn default() -> Self {
        Self {
            current_annual_cost: dec!(25_000),
            inflation_rate: dec!(5),
            duration_years: 4,
            savings_percent_goal: dec!(100),
            current_savings: dec!(10_000),
            investment_return_rate: dec!(6),
            tax_rate_on_gains: dec!(15),
            years_until_college: 10,
        }
    }
}

/// One year of the savings-vs-cost projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeProjectionYear {
    pub year: u32,
    pub savings_balance: Money,
    /// Zero outside the college years
    pub annual_cost: Money,
    pub shortfall: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeCostOutput {
    pub first_year_cost: Money,
    pub total_cost: Money,
    pub cost_by_college_year: Vec<Money>,
    pub required_savings: Money,
    pub current_savings_growth: Money,
    pub additional_needed: Money,
    pub monthly_contribution: Money,
    pub annual_contribution: Money,
    pub total_contributions: Money,
    /// Share of the goal already covered by current savings (capped at 100)
    pub funded_percent: Percent,
    pub after_tax_return: Percent,
    pub projection: Vec<CollegeProjectionYear>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project future college costs and the monthly saving needed to meet the goal.
///
/// Returns [`Outcome::Error`] when the current cost is not positive, the
/// duration is not positive, the start is in the past, either span exceeds
/// [`MAX_PLAN_YEARS`], or the projection overflows.
pub fn project_college_cost(input: &CollegeCostInput) -> Outcome<ComputationOutput<CollegeCostOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.current_annual_cost <= Decimal::ZERO {
        return Outcome::error("Current annual cost must be greater than zero.");
    }
    if input.duration_years <= 0 {
        return Outcome::error("College duration must be at least one year.");
    }
    if input.years_until_college < 0 {
        return Outcome::error("Years until college cannot be negative.");
    }
    if input.duration_years > MAX_PLAN_YEARS || input.years_until_college > MAX_PLAN_YEARS {
        return Outcome::error(format!(
            "College duration and years until college cannot exceed {MAX_PLAN_YEARS} years."
        ));
    }

    match project(input, &mut warnings) {
        Ok(output) => {
            let elapsed = start.elapsed().as_micros() as u64;
            Outcome::Ok(with_metadata(
                "College cost — inflated tuition vs. after-tax growth of savings and monthly contributions",
                input,
                warnings,
                elapsed,
                output,
            ))
        }
        Err(e) => {
            tracing::debug!(error = %e, "college projection failed");
            Outcome::error("Unable to calculate. Please verify your inputs.")
        }
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

fn project(input: &CollegeCostInput, warnings: &mut Vec<String>) -> FinCalcResult<CollegeCostOutput> {
    let years_until = non_negative(input.years_until_college, "years_until_college")?;
    let duration = non_negative(input.duration_years, "duration_years")?;

    let inflation = pct(input.inflation_rate);
    let after_tax_return: Rate = mul(
        pct(input.investment_return_rate),
        Decimal::ONE - pct(input.tax_rate_on_gains),
        "after-tax return",
    )?;
    let monthly_rate = after_tax_return / Decimal::from(MONTHS_PER_YEAR);

    let first_year_cost = mul(
        input.current_annual_cost,
        compound_factor(inflation, years_until)?,
        "first year cost",
    )?;
    let cost_by_college_year = (0..duration)
        .map(|k| mul(first_year_cost, compound_factor(inflation, k)?, "college year cost"))
        .collect::<FinCalcResult<Vec<Money>>>()?;
    let total_cost = cost_by_college_year
        .iter()
        .try_fold(Decimal::ZERO, |acc, cost| add(acc, *cost, "total cost"))?;

    let required_savings = mul(total_cost, pct(input.savings_percent_goal), "required savings")?;
    let current_savings_growth = mul(
        input.current_savings,
        compound_factor(after_tax_return, years_until)?,
        "current savings growth",
    )?;
    let additional_needed = (required_savings - current_savings_growth).max(Decimal::ZERO);

    let months = years_until * MONTHS_PER_YEAR;
    let monthly_contribution = if months == 0 {
        if additional_needed > Decimal::ZERO {
            warnings.push(
                "College starts now; no months remain to save the additional amount needed".into(),
            );
        }
        Decimal::ZERO
    } else {
        fv_annuity_payment(additional_needed, monthly_rate, months)?
    };

    let funded_percent = if required_savings > Decimal::ZERO {
        current_savings_growth
            .checked_div(required_savings)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
    } else {
        Decimal::ONE_HUNDRED
    };

    let mut projection = Vec::with_capacity((years_until + duration) as usize);
    for year in 0..years_until + duration {
        let savings_balance = savings_balance_at(
            input.current_savings,
            monthly_contribution,
            after_tax_return,
            monthly_rate,
            year,
            years_until,
        )?;
        let annual_cost = if year >= years_until {
            mul(first_year_cost, compound_factor(inflation, year - years_until)?, "annual cost")?
        } else {
            Decimal::ZERO
        };
        projection.push(CollegeProjectionYear {
            year,
            savings_balance,
            annual_cost,
            shortfall: (annual_cost - savings_balance).max(Decimal::ZERO),
        });
    }
    tracing::debug!(rows = projection.len(), "college projection built");

    Ok(CollegeCostOutput {
        first_year_cost,
        total_cost,
        cost_by_college_year,
        required_savings,
        current_savings_growth,
        additional_needed,
        monthly_contribution,
        annual_contribution: mul(
            monthly_contribution,
            Decimal::from(MONTHS_PER_YEAR),
            "annual contribution",
        )?,
        total_contributions: mul(
            monthly_contribution,
            Decimal::from(months),
            "total contributions",
        )?,
        funded_percent,
        after_tax_return: mul(after_tax_return, Decimal::ONE_HUNDRED, "after-tax return")?,
        projection,
    })
}

/// Savings at the start of `year`: current savings grown annually plus the
/// value of monthly contributions, which stop once college begins and keep
/// growing after that.
fn savings_balance_at(
    current_savings: Money,
    monthly_contribution: Money,
    annual_rate: Rate,
    monthly_rate: Rate,
    year: u32,
    years_until: u32,
) -> FinCalcResult<Money> {
    let grown_savings = mul(current_savings, compound_factor(annual_rate, year)?, "savings")?;
    let contribution_months = year.min(years_until) * MONTHS_PER_YEAR;
    let growth_months = year.saturating_sub(years_until) * MONTHS_PER_YEAR;
    let contributions = mul(
        fv_annuity(monthly_contribution, monthly_rate, contribution_months)?,
        compound_factor(monthly_rate, growth_months)?,
        "contribution growth",
    )?;
    add(grown_savings, contributions, "savings balance")
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

fn non_negative(value: i32, field: &str) -> FinCalcResult<u32> {
    u32::try_from(value).map_err(|_| FinCalcError::InvalidInput {
        field: field.into(),
        reason: "must not be negative".into(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
