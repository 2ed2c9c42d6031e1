//! Accrued interest and clean / dirty pricing between coupon dates.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::bonds::{bond_price, CouponFrequency, MAX_YEARS_TO_MATURITY};
use crate::error::FinCalcError;
use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent, Years};
use crate::FinCalcResult;

const DATE_FORMAT: &str = "%Y-%m-%d";
const GENERIC_ERROR: &str = "Unable to calculate. Please verify your inputs.";
const SETTLEMENT_ERROR: &str = "Settlement date must be before maturity date.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Day count convention for accruing interest within a coupon period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// 30/360 US corporate convention
    #[default]
    #[serde(alias = "30/360")]
    Thirty360,
    /// ACT/360 money market convention
    #[serde(alias = "Actual/360")]
    Actual360,
    /// ACT/365 fixed
    #[serde(alias = "Actual/365")]
    Actual365,
    /// ACT/ACT
    #[serde(alias = "Actual/Actual")]
    ActualActual,
}

/// Input for accrued interest and clean / dirty price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccruedInterestInput {
    #[serde(default)]
    pub face_value: Money,
    /// Annual coupon rate in percent units
    #[serde(default)]
    pub coupon_rate: Percent,
    /// Annual yield in percent units
    #[serde(default)]
    pub yield_rate: Percent,
    #[serde(default)]
    pub frequency: CouponFrequency,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub settlement_date: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub maturity_date: String,
    #[serde(default)]
    pub day_count: DayCountConvention,
}

impl Default for AccruedInterestInput {
    fn default() -> Self {
        Self {
            face_value: dec!(1000),
            coupon_rate: dec!(5),
            yield_rate: dec!(6),
            frequency: CouponFrequency::Semiannually,
            settlement_date: "2024-03-15".into(),
            maturity_date: "2034-01-15".into(),
            day_count: DayCountConvention::Thirty360,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccruedInterestOutput {
    pub last_coupon_date: NaiveDate,
    pub next_coupon_date: NaiveDate,
    pub days_since_last_coupon: i64,
    pub days_in_period: Decimal,
    pub days_to_maturity: i64,
    pub years_to_maturity: Years,
    pub coupon_payment: Money,
    pub accrued_interest: Money,
    pub clean_price: Money,
    pub dirty_price: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Accrued interest since the last coupon, plus clean and dirty price at the
/// given yield.
///
/// The last coupon date is found by stepping back from maturity in
/// `365 / frequency` whole-day increments. Clean price discounts with
/// `years = days_to_maturity / 365`.
pub fn calculate_accrued_interest(
    input: &AccruedInterestInput,
) -> Outcome<ComputationOutput<AccruedInterestOutput>> {
    let start = Instant::now();

    let (settlement, maturity) = match (
        parse_date(&input.settlement_date),
        parse_date(&input.maturity_date),
    ) {
        (Ok(s), Ok(m)) => (s, m),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(error = %e, "accrued interest date parse failed");
            return Outcome::error(GENERIC_ERROR);
        }
    };
    if settlement >= maturity {
        return Outcome::error(SETTLEMENT_ERROR);
    }

    match accrue(input, settlement, maturity) {
        Ok(output) => {
            let elapsed = start.elapsed().as_micros() as u64;
            Outcome::Ok(with_metadata(
                "Accrued interest — day-count fraction of the current coupon; clean + accrued = dirty",
                input,
                Vec::new(),
                elapsed,
                output,
            ))
        }
        Err(e) => {
            tracing::debug!(error = %e, "accrued interest calculation failed");
            Outcome::error(GENERIC_ERROR)
        }
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

fn accrue(
    input: &AccruedInterestInput,
    settlement: NaiveDate,
    maturity: NaiveDate,
) -> FinCalcResult<AccruedInterestOutput> {
    if input.face_value <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "face_value".into(),
            reason: "Face value must be positive".into(),
        });
    }
    let days_to_maturity = (maturity - settlement).num_days();
    if days_to_maturity > i64::from(MAX_YEARS_TO_MATURITY) * 365 {
        return Err(FinCalcError::InvalidInput {
            field: "maturity_date".into(),
            reason: format!("Maturity cannot be more than {MAX_YEARS_TO_MATURITY} years away"),
        });
    }

    let m = input.frequency.payments_per_year();
    let m_dec = Decimal::from(m);
    let step = Duration::days(365 / i64::from(m));

    let mut last_coupon = maturity;
    while last_coupon > settlement {
        last_coupon -= step;
    }
    let next_coupon = last_coupon + step;

    let actual_days = (settlement - last_coupon).num_days();
    let (days_since_last_coupon, days_in_period) = match input.day_count {
        DayCountConvention::Thirty360 => (
            i64::from(thirty_360_days(last_coupon, settlement)),
            dec!(360) / m_dec,
        ),
        DayCountConvention::Actual360 => (actual_days, dec!(360) / m_dec),
        DayCountConvention::Actual365 => (actual_days, dec!(365) / m_dec),
        DayCountConvention::ActualActual => (
            actual_days,
            Decimal::from((next_coupon - last_coupon).num_days()),
        ),
    };
    if days_in_period.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "days in coupon period".into(),
        });
    }

    let coupon_rate = pct(input.coupon_rate);
    let coupon_payment = input.face_value * coupon_rate / m_dec;
    let accrued_interest = coupon_payment * Decimal::from(days_since_last_coupon) / days_in_period;

    let years_to_maturity = Decimal::from(days_to_maturity) / dec!(365);
    let clean_price = bond_price(
        input.face_value,
        coupon_rate,
        pct(input.yield_rate),
        m,
        years_to_maturity,
    )?;

    Ok(AccruedInterestOutput {
        last_coupon_date: last_coupon,
        next_coupon_date: next_coupon,
        days_since_last_coupon,
        days_in_period,
        days_to_maturity,
        years_to_maturity,
        coupon_payment,
        accrued_interest,
        clean_price,
        dirty_price: clean_price + accrued_interest,
    })
}

fn parse_date(value: &str) -> FinCalcResult<NaiveDate> {
    Ok(NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)?)
}

/// 30/360 day count (raw days, not fraction).
fn thirty_360_days(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut d1 = start.day() as i32;
    let mut d2 = end.day() as i32;
    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 && d1 >= 30 {
        d2 = 30;
    }
    (end.year() - start.year()) * 360
        + (end.month() as i32 - start.month() as i32) * 30
        + (d2 - d1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn annual(settlement: &str, day_count: DayCountConvention) -> AccruedInterestInput {
        AccruedInterestInput {
            frequency: CouponFrequency::Annually,
            settlement_date: settlement.into(),
            maturity_date: "2030-01-01".into(),
            day_count,
            ..AccruedInterestInput::default()
        }
    }

    #[test]
    fn test_distant_maturity_is_error() {
        let input = AccruedInterestInput {
            maturity_date: "9999-12-31".into(),
            ..annual("2024-01-01", DayCountConvention::Actual365)
        };
        assert_eq!(
            calculate_accrued_interest(&input).error_message(),
            Some(GENERIC_ERROR)
        );
    }

    #[test]
    fn test_thirty_360_half_year() {
        let out = calculate_accrued_interest(&annual("2029-07-01", DayCountConvention::Thirty360))
            .ok()
            .unwrap()
            .result;
        assert_eq!(out.last_coupon_date, NaiveDate::from_ymd_opt(2029, 1, 1).unwrap());
        assert_eq!(out.days_since_last_coupon, 180);
        assert_eq!(out.days_in_period, dec!(360));
        assert_eq!(out.accrued_interest, dec!(25));
    }

    #[test]
    fn test_actual_365() {
        let out = calculate_accrued_interest(&annual("2029-07-01", DayCountConvention::Actual365))
            .ok()
            .unwrap()
            .result;
        assert_eq!(out.days_since_last_coupon, 181);
        assert!((out.accrued_interest - dec!(24.7945)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_actual_actual_uses_real_period_length() {
        let out =
            calculate_accrued_interest(&annual("2029-07-01", DayCountConvention::ActualActual))
                .ok()
                .unwrap()
                .result;
        assert_eq!(out.days_in_period, dec!(365));
        assert_eq!(out.next_coupon_date, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    }

    #[test]
    fn test_on_coupon_date_clean_equals_dirty() {
        let input = AccruedInterestInput {
            yield_rate: dec!(5),
            ..annual("2029-01-01", DayCountConvention::Actual365)
        };
        let out = calculate_accrued_interest(&input).ok().unwrap().result;
        assert_eq!(out.accrued_interest, Decimal::ZERO);
        assert_eq!(out.years_to_maturity, Decimal::ONE);
        assert!((out.clean_price - dec!(1000)).abs() < dec!(0.0001));
        assert_eq!(out.dirty_price, out.clean_price);
    }

    #[test]
    fn test_default_dirty_is_clean_plus_accrued() {
        let out = calculate_accrued_interest(&AccruedInterestInput::default())
            .ok()
            .unwrap()
            .result;
        assert!(out.last_coupon_date <= NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(out.next_coupon_date > NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(out.accrued_interest >= Decimal::ZERO);
        assert_eq!(out.dirty_price, out.clean_price + out.accrued_interest);
    }

    #[test]
    fn test_settlement_after_maturity_is_error() {
        let input = annual("2030-01-01", DayCountConvention::Thirty360);
        assert_eq!(
            calculate_accrued_interest(&input).error_message(),
            Some(SETTLEMENT_ERROR)
        );
    }

    #[test]
    fn test_malformed_date_is_generic_error() {
        let input = annual("15/03/2024", DayCountConvention::Thirty360);
        assert_eq!(
            calculate_accrued_interest(&input).error_message(),
            Some(GENERIC_ERROR)
        );
    }

    #[test]
    fn test_day_count_accepts_display_names() {
        let dc: DayCountConvention = serde_json::from_str(r#""Actual/360""#).unwrap();
        assert_eq!(dc, DayCountConvention::Actual360);
    }
}
