//! Bond pricing from yield and yield from price.
//!
//! Price is the closed-form present value of the coupon stream plus face
//! value. The inverse problem (yield to maturity from a quoted price) is
//! solved with Newton-Raphson on the periodic rate, seeded with the current
//! yield. Also produces the coupon cash-flow schedule and duration measures.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::format::round_to;
use crate::time_value::power;
use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent, Rate, Years};
use crate::FinCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const NEWTON_MAX_ITERATIONS: u32 = 100;
const NEWTON_PRICE_TOLERANCE: Decimal = dec!(0.0001);
/// Lower bound on the periodic rate during the Newton search.
const MIN_PERIODIC_RATE: Decimal = dec!(-0.99);
const SCHEDULE_DP: u32 = 4;
const PAR_TOLERANCE: Decimal = dec!(0.005);
/// Longest maturity priced, which keeps monthly schedules at 1200 rows.
pub const MAX_YEARS_TO_MATURITY: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Coupon payments per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponFrequency {
    Annually,
    #[default]
    Semiannually,
    Quarterly,
    Monthly,
}

impl CouponFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            CouponFrequency::Annually => 1,
            CouponFrequency::Semiannually => 2,
            CouponFrequency::Quarterly => 4,
            CouponFrequency::Monthly => 12,
        }
    }

    pub fn months_per_period(self) -> u32 {
        12 / self.payments_per_year()
    }
}

/// What the calculator solves for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BondSolveFor {
    /// Price the bond at the given annual yield (percent units)
    Price { yield_rate: Percent },
    /// Find the yield to maturity that reproduces the given price
    Yield { price: Money },
}

/// Input parameters for bond price / yield analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondInput {
    #[serde(default)]
    pub face_value: Money,
    /// Annual coupon rate in percent units
    #[serde(default)]
    pub coupon_rate: Percent,
    #[serde(default)]
    pub frequency: CouponFrequency,
    #[serde(default)]
    pub years_to_maturity: Years,
    pub solve_for: BondSolveFor,
    /// First date of the cash-flow schedule; today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start: Option<NaiveDate>,
}

impl Default for BondInput {
    fn default() -> Self {
        Self {
            face_value: dec!(1000),
            coupon_rate: dec!(5),
            frequency: CouponFrequency::Semiannually,
            years_to_maturity: dec!(10),
            solve_for: BondSolveFor::Price {
                yield_rate: dec!(6),
            },
            schedule_start: None,
        }
    }
}

/// Whether the bond trades above, at, or below face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStatus {
    Premium,
    Par,
    Discount,
}

/// One coupon period of the cash-flow schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondCashFlow {
    pub period: u32,
    pub date: NaiveDate,
    pub coupon_payment: Money,
    pub principal_payment: Money,
    pub total_payment: Money,
    pub present_value: Money,
}

/// Output of bond price / yield analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondOutput {
    pub price: Money,
    /// Yield to maturity (percent units)
    pub yield_to_maturity: Percent,
    /// Annual coupon / price (percent units)
    pub current_yield: Percent,
    pub coupon_payment: Money,
    pub periods: Decimal,
    pub total_coupons: Money,
    /// Macaulay duration in years
    pub macaulay_duration: Decimal,
    /// Modified duration in years
    pub modified_duration: Decimal,
    pub price_status: PriceStatus,
    /// Newton iterations used (0 when pricing from yield)
    pub iterations: u32,
    pub converged: bool,
    pub cash_flows: Vec<BondCashFlow>,
}

/// Result of the yield solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldSolution {
    /// Annual yield as a decimal
    pub yield_rate: Rate,
    pub iterations: u32,
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price a bond from its yield, or solve the yield from its price, and build
/// the cash-flow schedule.
///
/// Invalid inputs and arithmetic failures come back as [`Outcome::Error`]
/// with a readable message.
pub fn calculate_bond(input: &BondInput) -> Outcome<ComputationOutput<BondOutput>> {
    let start = Instant::now();
    let today = Utc::now().date_naive();

    match analyse_bond(input, input.schedule_start.unwrap_or(today)) {
        Ok((output, warnings)) => {
            let elapsed = start.elapsed().as_micros() as u64;
            Outcome::Ok(with_metadata(
                "Bond pricing — PV of coupons and face value, Newton-Raphson yield solve",
                input,
                warnings,
                elapsed,
                output,
            ))
        }
        Err(FinCalcError::InvalidInput { reason, .. }) => Outcome::Error { message: reason },
        Err(e) => {
            tracing::debug!(error = %e, "bond calculation failed");
            Outcome::error("Unable to calculate. Please verify your inputs.")
        }
    }
}

/// Present value of the coupon stream plus face value.
///
/// `periods = years * frequency`; coupons are discounted for each whole period
/// `1..=floor(periods)` and the face value at exactly `periods`.
pub fn bond_price(
    face_value: Money,
    coupon_rate: Rate,
    annual_yield: Rate,
    payments_per_year: u32,
    years: Years,
) -> FinCalcResult<Money> {
    let (price, _) = price_with_derivative(
        face_value,
        coupon_rate,
        annual_yield / Decimal::from(payments_per_year),
        payments_per_year,
        years,
    )?;
    Ok(price)
}

/// Solve for the annual yield that prices the bond at `target_price`.
///
/// Newton-Raphson on the periodic rate, seeded with the current yield
/// `coupon_rate * face / price`. Stops once the repriced bond is within
/// 0.0001 of the target, or after 100 iterations, in which case the last
/// estimate is returned with `converged = false`.
pub fn solve_yield(
    face_value: Money,
    coupon_rate: Rate,
    target_price: Money,
    payments_per_year: u32,
    years: Years,
) -> FinCalcResult<YieldSolution> {
    if target_price <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "price".into(),
            reason: "Bond price must be positive".into(),
        });
    }

    let m = Decimal::from(payments_per_year);
    let mut periodic = coupon_rate * face_value / target_price / m;

    for iteration in 0..NEWTON_MAX_ITERATIONS {
        let (price, derivative) =
            price_with_derivative(face_value, coupon_rate, periodic, payments_per_year, years)?;
        let delta = price - target_price;

        if delta.abs() < NEWTON_PRICE_TOLERANCE {
            tracing::debug!(iterations = iteration, "yield solve converged");
            return Ok(YieldSolution {
                yield_rate: periodic * m,
                iterations: iteration,
                converged: true,
            });
        }
        if derivative.is_zero() {
            break;
        }

        periodic -= delta / derivative;
        if periodic < MIN_PERIODIC_RATE {
            periodic = MIN_PERIODIC_RATE;
        }
    }

    tracing::warn!(
        iterations = NEWTON_MAX_ITERATIONS,
        "yield solve did not converge; returning last estimate"
    );
    Ok(YieldSolution {
        yield_rate: periodic * m,
        iterations: NEWTON_MAX_ITERATIONS,
        converged: false,
    })
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

fn analyse_bond(
    input: &BondInput,
    schedule_start: NaiveDate,
) -> FinCalcResult<(BondOutput, Vec<String>)> {
    validate_input(input)?;
    let mut warnings: Vec<String> = Vec::new();

    let m = input.frequency.payments_per_year();
    let m_dec = Decimal::from(m);
    let coupon_rate = pct(input.coupon_rate);
    let coupon_payment = checked_mul(input.face_value, coupon_rate)? / m_dec;
    let periods = input.years_to_maturity * m_dec;

    let (price, annual_yield, iterations, converged) = match input.solve_for {
        BondSolveFor::Price { yield_rate } => {
            let y = pct(yield_rate);
            let price = bond_price(input.face_value, coupon_rate, y, m, input.years_to_maturity)?;
            (price, y, 0, true)
        }
        BondSolveFor::Yield { price } => {
            let solution =
                solve_yield(input.face_value, coupon_rate, price, m, input.years_to_maturity)?;
            if !solution.converged {
                warnings.push(format!(
                    "Yield solve did not converge after {} iterations; showing best estimate",
                    solution.iterations
                ));
            }
            (price, solution.yield_rate, solution.iterations, solution.converged)
        }
    };

    let periodic = annual_yield / m_dec;
    let cash_flows = build_cash_flow_schedule(
        schedule_start,
        input.frequency,
        periods,
        coupon_payment,
        input.face_value,
        periodic,
    )?;

    let (macaulay_duration, modified_duration) =
        durations(input.face_value, coupon_payment, periodic, m, periods)?;

    let current_yield = if price > Decimal::ZERO {
        input.face_value * coupon_rate / price * Decimal::ONE_HUNDRED
    } else {
        warnings.push("Price is zero or negative; current yield undefined".into());
        Decimal::ZERO
    };

    let price_status = if (price - input.face_value).abs() < PAR_TOLERANCE {
        PriceStatus::Par
    } else if price > input.face_value {
        PriceStatus::Premium
    } else {
        PriceStatus::Discount
    };

    let whole_periods = periods.floor();
    let output = BondOutput {
        price,
        yield_to_maturity: annual_yield * Decimal::ONE_HUNDRED,
        current_yield,
        coupon_payment,
        periods,
        total_coupons: coupon_payment * whole_periods,
        macaulay_duration,
        modified_duration,
        price_status,
        iterations,
        converged,
        cash_flows,
    };

    Ok((output, warnings))
}

fn validate_input(input: &BondInput) -> FinCalcResult<()> {
    if input.face_value <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "face_value".into(),
            reason: "Face value must be positive".into(),
        });
    }
    if input.coupon_rate < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "coupon_rate".into(),
            reason: "Coupon rate cannot be negative".into(),
        });
    }
    if input.years_to_maturity <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: "Years to maturity must be positive".into(),
        });
    }
    if input.years_to_maturity > Decimal::from(MAX_YEARS_TO_MATURITY) {
        return Err(FinCalcError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: format!("Years to maturity cannot exceed {MAX_YEARS_TO_MATURITY}"),
        });
    }
    Ok(())
}

/// Price and dPrice/dr at periodic rate `r`.
pub(crate) fn price_with_derivative(
    face_value: Money,
    coupon_rate: Rate,
    periodic_rate: Rate,
    payments_per_year: u32,
    years: Years,
) -> FinCalcResult<(Money, Decimal)> {
    if periodic_rate <= dec!(-1) {
        return Err(FinCalcError::InvalidInput {
            field: "yield".into(),
            reason: "Yield must be greater than -100% per period".into(),
        });
    }
    let m = Decimal::from(payments_per_year);
    let coupon = checked_mul(face_value, coupon_rate)? / m;
    let periods = years * m;
    let whole_periods = whole_periods(periods)?;
    let one_plus_r = Decimal::ONE + periodic_rate;

    let mut price = Decimal::ZERO;
    let mut derivative = Decimal::ZERO;
    let mut discount = Decimal::ONE;
    for i in 1..=whole_periods {
        discount = checked_div(discount, one_plus_r)?;
        let pv = checked_mul(coupon, discount)?;
        price = checked_add(price, pv)?;
        derivative -= checked_div(checked_mul(Decimal::from(i), pv)?, one_plus_r)?;
    }

    let growth = power(one_plus_r, periods)?;
    let principal_pv = checked_div(face_value, growth)?;
    price = checked_add(price, principal_pv)?;
    derivative -= checked_div(checked_mul(periods, principal_pv)?, one_plus_r)?;

    Ok((price, derivative))
}

fn build_cash_flow_schedule(
    schedule_start: NaiveDate,
    frequency: CouponFrequency,
    periods: Decimal,
    coupon_payment: Money,
    face_value: Money,
    periodic_rate: Rate,
) -> FinCalcResult<Vec<BondCashFlow>> {
    let rows = whole_periods(periods.ceil())?;
    let one_plus_r = Decimal::ONE + periodic_rate;
    let months = frequency.months_per_period() as i32;

    let mut schedule = Vec::with_capacity(rows as usize);
    let mut discount = Decimal::ONE;
    for period in 1..=rows {
        discount = checked_div(discount, one_plus_r)?;
        let principal = if period == rows {
            face_value
        } else {
            Decimal::ZERO
        };
        let total = coupon_payment + principal;
        schedule.push(BondCashFlow {
            period,
            date: add_months(schedule_start, months * period as i32),
            coupon_payment: round_to(coupon_payment, SCHEDULE_DP),
            principal_payment: round_to(principal, SCHEDULE_DP),
            total_payment: round_to(total, SCHEDULE_DP),
            present_value: round_to(total * discount, SCHEDULE_DP),
        });
    }
    Ok(schedule)
}

/// Macaulay and modified duration, in years.
fn durations(
    face_value: Money,
    coupon_payment: Money,
    periodic_rate: Rate,
    payments_per_year: u32,
    periods: Decimal,
) -> FinCalcResult<(Decimal, Decimal)> {
    let m = Decimal::from(payments_per_year);
    let one_plus_r = Decimal::ONE + periodic_rate;
    let mut model_price = Decimal::ZERO;
    let mut weighted = Decimal::ZERO;
    let mut discount = Decimal::ONE;
    for i in 1..=whole_periods(periods)? {
        discount = checked_div(discount, one_plus_r)?;
        model_price += coupon_payment * discount;
        weighted += Decimal::from(i) * coupon_payment * discount;
    }
    let principal_pv = checked_div(face_value, power(one_plus_r, periods)?)?;
    model_price += principal_pv;
    weighted += periods * principal_pv;

    if model_price <= Decimal::ZERO {
        return Ok((Decimal::ZERO, Decimal::ZERO));
    }
    let macaulay = weighted / model_price / m;
    Ok((macaulay, macaulay / one_plus_r))
}

/// Whole coupon periods, capped at a monthly bond of the longest maturity.
fn whole_periods(periods: Decimal) -> FinCalcResult<u32> {
    periods
        .floor()
        .to_u32()
        .filter(|n| *n <= MAX_YEARS_TO_MATURITY * 12)
        .ok_or_else(|| FinCalcError::InvalidInput {
            field: "years_to_maturity".into(),
            reason: "Too many coupon periods".into(),
        })
}

fn checked_mul(a: Decimal, b: Decimal) -> FinCalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| FinCalcError::Overflow {
        context: "bond present value".into(),
    })
}

fn checked_add(a: Decimal, b: Decimal) -> FinCalcResult<Decimal> {
    a.checked_add(b).ok_or_else(|| FinCalcError::Overflow {
        context: "bond present value".into(),
    })
}

fn checked_div(numerator: Decimal, denominator: Decimal) -> FinCalcResult<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| FinCalcError::DivisionByZero {
            context: "bond discount factor".into(),
        })
}

// ---------------------------------------------------------------------------
// Date helpers
// ---------------------------------------------------------------------------

/// Add a number of months to a date, clamping the day to the month's max.
pub(crate) fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total_months = date.year() * 12 + date.month() as i32 - 1 + months;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    let max_day = days_in_month(new_year, new_month);
    let day = date.day().min(max_day);
    NaiveDate::from_ymd_opt(new_year, new_month, day).unwrap_or(date)
}

/// Number of days in a given month/year.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
