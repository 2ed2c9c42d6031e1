//! Depreciation schedules: straight-line, declining balance and
//! sum-of-years-digits, each with an optional partial first year.
//!
//! Charges are computed at full precision; only the emitted rows are rounded.
//! The final period always absorbs whatever basis remains, so accumulated
//! depreciation on the last row equals `cost - salvage`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::format::round_money;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest useful life a schedule is built for.
pub const MAX_USEFUL_LIFE_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    StraightLine,
    #[default]
    DecliningBalance,
    #[serde(alias = "sum_of_years")]
    SumOfYearsDigits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    #[serde(default)]
    pub method: DepreciationMethod,
    #[serde(default)]
    pub asset_cost: Money,
    #[serde(default)]
    pub salvage_value: Money,
    #[serde(default)]
    pub useful_life_years: u32,
    /// Multiple of the straight-line rate (2 = double-declining). Declining balance only.
    #[serde(default)]
    pub declining_factor: Decimal,
    #[serde(default)]
    pub round_to_whole_units: bool,
    #[serde(default)]
    pub partial_first_year: bool,
    /// Months of service in the first year (1-12), used when `partial_first_year` is set
    #[serde(default)]
    pub months_in_first_year: u32,
}

impl Default for DepreciationInput {
    fn default() -> Self {
        Self {
            method: DepreciationMethod::DecliningBalance,
            asset_cost: dec!(11_000),
            salvage_value: dec!(1_000),
            useful_life_years: 5,
            declining_factor: dec!(2),
            round_to_whole_units: false,
            partial_first_year: false,
            months_in_first_year: 6,
        }
    }
}

/// One period of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationRow {
    pub period: u32,
    pub beginning_book_value: Money,
    pub depreciation_expense: Money,
    pub accumulated_depreciation: Money,
    pub ending_book_value: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSummary {
    pub depreciable_basis: Money,
    pub total_depreciation: Money,
    pub first_period_depreciation: Money,
    pub average_annual_depreciation: Money,
    pub periods: u32,
    /// Per-period rate applied to book value (declining balance only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declining_rate: Option<Rate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepreciationOutput {
    pub schedule: Vec<DepreciationRow>,
    pub summary: DepreciationSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the depreciation schedule.
///
/// Invalid inputs (non-positive cost, zero life, salvage not below cost)
/// yield an empty schedule with a zeroed summary rather than an error. A life
/// beyond [`MAX_USEFUL_LIFE_YEARS`] is rejected the same way, with a warning.
pub fn calculate_depreciation(input: &DepreciationInput) -> ComputationOutput<DepreciationOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let methodology = match input.method {
        DepreciationMethod::StraightLine => "Straight-line depreciation",
        DepreciationMethod::DecliningBalance => "Declining balance depreciation",
        DepreciationMethod::SumOfYearsDigits => "Sum-of-years-digits depreciation",
    };

    if input.useful_life_years > MAX_USEFUL_LIFE_YEARS {
        warnings.push(format!("Useful life cannot exceed {MAX_USEFUL_LIFE_YEARS} years"));
    }
    if input.asset_cost <= Decimal::ZERO
        || input.useful_life_years == 0
        || input.useful_life_years > MAX_USEFUL_LIFE_YEARS
        || input.salvage_value >= input.asset_cost
    {
        tracing::debug!("depreciation inputs rejected; returning empty schedule");
        return with_metadata(
            methodology,
            input,
            warnings,
            start.elapsed().as_micros() as u64,
            DepreciationOutput::default(),
        );
    }

    let first_year_fraction = if input.partial_first_year {
        let months = input.months_in_first_year.clamp(1, 12);
        if months != input.months_in_first_year {
            warnings.push(format!(
                "Months in first year adjusted from {} to {}",
                input.months_in_first_year, months
            ));
        }
        Decimal::from(months) / MONTHS_PER_YEAR
    } else {
        Decimal::ONE
    };

    let basis = input.asset_cost - input.salvage_value;
    let life = input.useful_life_years;
    let (charges, declining_rate) = match input.method {
        DepreciationMethod::StraightLine => (straight_line(basis, life, first_year_fraction), None),
        DepreciationMethod::DecliningBalance => {
            let rate = input.declining_factor / Decimal::from(life);
            if input.declining_factor <= Decimal::ZERO {
                warnings.push(
                    "Declining factor is not positive; full basis is charged in the final period"
                        .into(),
                );
            }
            let charges = declining_balance(
                input.asset_cost,
                input.salvage_value,
                rate,
                life,
                first_year_fraction,
            );
            (charges, Some(rate))
        }
        DepreciationMethod::SumOfYearsDigits => {
            (sum_of_years_digits(basis, life, first_year_fraction), None)
        }
    };

    let output = build_output(input, &charges, declining_rate);
    tracing::debug!(periods = output.schedule.len(), "depreciation schedule built");

    with_metadata(
        methodology,
        input,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    )
}

// ---------------------------------------------------------------------------
// Per-method charges (full precision)
// ---------------------------------------------------------------------------

/// Constant annual charge. With a partial first year the first period carries
/// `fraction` of a year and an extra final period carries the rest.
fn straight_line(basis: Money, life: u32, fraction: Decimal) -> Vec<Money> {
    let annual = basis / Decimal::from(life);
    let mut charges = Vec::with_capacity(life as usize + 1);
    charges.push(annual * fraction);
    for _ in 2..=life {
        charges.push(annual);
    }
    if fraction < Decimal::ONE {
        charges.push(annual * (Decimal::ONE - fraction));
    }
    settle_final_period(&mut charges, basis);
    charges
}

/// Rate applied to current book value, capped at salvage. Stops early once
/// salvage is reached; the last nominal period charges down to salvage.
fn declining_balance(
    cost: Money,
    salvage: Money,
    rate: Rate,
    life: u32,
    fraction: Decimal,
) -> Vec<Money> {
    let periods = if fraction < Decimal::ONE { life + 1 } else { life };
    let mut charges = Vec::with_capacity(periods as usize);
    let mut book = cost;

    for period in 1..=periods {
        if book <= salvage {
            break;
        }
        let remaining = book - salvage;
        let charge = if period == periods {
            remaining
        } else {
            let scaled = if period == 1 { rate * fraction } else { rate };
            book.checked_mul(scaled)
                .unwrap_or(remaining)
                .max(Decimal::ZERO)
                .min(remaining)
        };
        charges.push(charge);
        book -= charge;
    }
    charges
}

/// Year `k` takes `(life - k + 1) / (life (life + 1) / 2)` of the basis. With a
/// partial first year each period blends the tail of the previous year's
/// factor with the head of the current one in proportion to the month split.
fn sum_of_years_digits(basis: Money, life: u32, fraction: Decimal) -> Vec<Money> {
    let life_digits = u64::from(life);
    let sum_of_years = Decimal::from(life_digits * (life_digits + 1) / 2);
    let factor = |year: u32| Decimal::from(life - year + 1) / sum_of_years;

    let mut charges = Vec::with_capacity(life as usize + 1);
    if fraction == Decimal::ONE {
        for year in 1..=life {
            charges.push(basis * factor(year));
        }
    } else {
        let tail = Decimal::ONE - fraction;
        charges.push(basis * factor(1) * fraction);
        for period in 2..=life {
            charges.push(basis * (factor(period - 1) * tail + factor(period) * fraction));
        }
        charges.push(basis * factor(life) * tail);
    }
    settle_final_period(&mut charges, basis);
    charges
}

/// Replace the last charge with whatever basis is left after the others.
fn settle_final_period(charges: &mut [Money], basis: Money) {
    if let Some((last, earlier)) = charges.split_last_mut() {
        let charged: Money = earlier.iter().copied().sum();
        *last = basis - charged;
    }
}

// ---------------------------------------------------------------------------
// Rows and summary
// ---------------------------------------------------------------------------

fn build_output(
    input: &DepreciationInput,
    charges: &[Money],
    declining_rate: Option<Rate>,
) -> DepreciationOutput {
    let whole = input.round_to_whole_units;
    let mut accumulated = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(charges.len());

    for (i, &charge) in charges.iter().enumerate() {
        let beginning = input.asset_cost - accumulated;
        accumulated += charge;
        let ending = (input.asset_cost - accumulated).max(input.salvage_value);
        schedule.push(DepreciationRow {
            period: i as u32 + 1,
            beginning_book_value: round_money(beginning, whole),
            depreciation_expense: round_money(charge, whole),
            accumulated_depreciation: round_money(accumulated, whole),
            ending_book_value: round_money(ending, whole),
        });
    }

    let summary = DepreciationSummary {
        depreciable_basis: round_money(input.asset_cost - input.salvage_value, whole),
        total_depreciation: round_money(accumulated, whole),
        first_period_depreciation: round_money(charges.first().copied().unwrap_or_default(), whole),
        average_annual_depreciation: round_money(
            accumulated / Decimal::from(input.useful_life_years),
            whole,
        ),
        periods: charges.len() as u32,
        declining_rate,
    };

    DepreciationOutput { schedule, summary }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expenses(input: &DepreciationInput) -> Vec<Money> {
        calculate_depreciation(input)
            .result
            .schedule
            .iter()
            .map(|r| r.depreciation_expense)
            .collect()
    }

    fn with_method(method: DepreciationMethod) -> DepreciationInput {
        DepreciationInput {
            method,
            ..DepreciationInput::default()
        }
    }

    #[test]
    fn test_straight_line_constant_charge() {
        let out = calculate_depreciation(&with_method(DepreciationMethod::StraightLine)).result;
        assert_eq!(out.schedule.len(), 5);
        for row in &out.schedule {
            assert_eq!(row.depreciation_expense, dec!(2000));
        }
        assert_eq!(out.schedule[4].ending_book_value, dec!(1000));
        assert_eq!(out.summary.declining_rate, None);
    }

    #[test]
    fn test_double_declining_sequence() {
        let out = calculate_depreciation(&DepreciationInput::default()).result;
        let charges: Vec<Money> = out.schedule.iter().map(|r| r.depreciation_expense).collect();
        assert_eq!(
            charges,
            vec![dec!(4400), dec!(2640), dec!(1584), dec!(950.40), dec!(425.60)]
        );
        assert_eq!(out.schedule[3].ending_book_value, dec!(1425.60));
        assert_eq!(out.schedule[4].ending_book_value, dec!(1000));
        assert_eq!(out.summary.declining_rate, Some(dec!(0.4)));
    }

    #[test]
    fn test_sum_of_years_digits_sequence() {
        let charges = expenses(&with_method(DepreciationMethod::SumOfYearsDigits));
        assert_eq!(
            charges,
            vec![dec!(3333.33), dec!(2666.67), dec!(2000), dec!(1333.33), dec!(666.67)]
        );
    }

    #[test]
    fn test_partial_year_straight_line_adds_final_period() {
        let input = DepreciationInput {
            partial_first_year: true,
            months_in_first_year: 6,
            ..with_method(DepreciationMethod::StraightLine)
        };
        let charges = expenses(&input);
        assert_eq!(
            charges,
            vec![dec!(1000), dec!(2000), dec!(2000), dec!(2000), dec!(2000), dec!(1000)]
        );
    }

    #[test]
    fn test_partial_year_declining_balance() {
        let input = DepreciationInput {
            partial_first_year: true,
            months_in_first_year: 6,
            ..DepreciationInput::default()
        };
        let charges = expenses(&input);
        assert_eq!(
            charges,
            vec![
                dec!(2200),
                dec!(3520),
                dec!(2112),
                dec!(1267.20),
                dec!(760.32),
                dec!(140.48)
            ]
        );
    }

    #[test]
    fn test_partial_year_sum_of_years_blends_factors() {
        // 3-month first year on a 5-year life: factors 5/15..1/15, split 0.25 / 0.75
        let input = DepreciationInput {
            partial_first_year: true,
            months_in_first_year: 3,
            ..with_method(DepreciationMethod::SumOfYearsDigits)
        };
        let charges = expenses(&input);
        assert_eq!(charges.len(), 6);
        assert_eq!(charges[0], dec!(833.33));
        // (5/15 * 0.75 + 4/15 * 0.25) * 10000
        assert_eq!(charges[1], dec!(3166.67));
        assert_eq!(charges[5], dec!(500));
    }

    #[test]
    fn test_twelve_month_partial_year_is_full_year() {
        let input = DepreciationInput {
            partial_first_year: true,
            months_in_first_year: 12,
            ..with_method(DepreciationMethod::SumOfYearsDigits)
        };
        assert_eq!(expenses(&input).len(), 5);
    }

    #[test]
    fn test_invalid_inputs_give_empty_schedule() {
        let salvage_too_high = DepreciationInput {
            salvage_value: dec!(11_000),
            ..DepreciationInput::default()
        };
        let out = calculate_depreciation(&salvage_too_high).result;
        assert!(out.schedule.is_empty());
        assert_eq!(out.summary, DepreciationSummary::default());

        let zero_life = DepreciationInput {
            useful_life_years: 0,
            ..DepreciationInput::default()
        };
        assert!(calculate_depreciation(&zero_life).result.schedule.is_empty());
    }

    #[test]
    fn test_whole_unit_rounding() {
        let input = DepreciationInput {
            round_to_whole_units: true,
            ..with_method(DepreciationMethod::SumOfYearsDigits)
        };
        let out = calculate_depreciation(&input).result;
        assert_eq!(out.schedule[0].depreciation_expense, dec!(3333));
        assert_eq!(out.schedule[1].depreciation_expense, dec!(2667));
        assert_eq!(out.schedule[4].accumulated_depreciation, dec!(10000));
    }

    #[test]
    fn test_summary_figures() {
        let out = calculate_depreciation(&DepreciationInput::default()).result;
        assert_eq!(out.summary.depreciable_basis, dec!(10000));
        assert_eq!(out.summary.total_depreciation, dec!(10000));
        assert_eq!(out.summary.first_period_depreciation, dec!(4400));
        assert_eq!(out.summary.average_annual_depreciation, dec!(2000));
        assert_eq!(out.summary.periods, 5);
    }

    #[test]
    fn test_life_above_limit_gives_empty_schedule() {
        for method in [
            DepreciationMethod::StraightLine,
            DepreciationMethod::DecliningBalance,
            DepreciationMethod::SumOfYearsDigits,
        ] {
            let input = DepreciationInput {
                useful_life_years: 70_000,
                ..with_method(method)
            };
            let out = calculate_depreciation(&input);
            assert!(out.result.schedule.is_empty());
            assert_eq!(out.result.summary.periods, 0);
            assert_eq!(out.warnings.len(), 1);
        }
    }

    #[test]
    fn test_sum_of_years_at_life_limit() {
        let input = DepreciationInput {
            useful_life_years: MAX_USEFUL_LIFE_YEARS,
            ..with_method(DepreciationMethod::SumOfYearsDigits)
        };
        let out = calculate_depreciation(&input).result;
        assert_eq!(out.schedule.len(), 100);
        // 100 / 5050 of the 10,000 basis
        assert_eq!(out.schedule[0].depreciation_expense, dec!(198.02));
        assert_eq!(out.summary.total_depreciation, dec!(10000));
    }

    #[test]
    fn test_oversized_declining_factor_caps_at_salvage() {
        let input = DepreciationInput {
            declining_factor: Decimal::MAX,
            ..DepreciationInput::default()
        };
        let out = calculate_depreciation(&input).result;
        assert_eq!(out.schedule.len(), 1);
        assert_eq!(out.schedule[0].ending_book_value, dec!(1000));
    }
}
