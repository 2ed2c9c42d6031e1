use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::FinCalcError;
use crate::types::{Money, Rate};
use crate::FinCalcResult;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound_factor(rate: Rate, n: u32) -> FinCalcResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| FinCalcError::Overflow {
                context: format!("compound factor (1 + {rate})^{n}"),
            })?;
    }
    Ok(result)
}

/// Raise `base` to a fractional exponent. Integral exponents go through
/// [`compound_factor`] so whole-period discounting stays exact.
pub fn power(base: Decimal, exponent: Decimal) -> FinCalcResult<Decimal> {
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }
    if exponent.fract().is_zero() {
        if let Some(n) = exponent.to_u32() {
            return compound_factor(base - Decimal::ONE, n);
        }
    }
    if base <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "base".into(),
            reason: format!("cannot raise {base} to fractional power {exponent}"),
        });
    }
    base.checked_powd(exponent)
        .ok_or_else(|| FinCalcError::Overflow {
            context: format!("{base}^{exponent}"),
        })
}

/// Level payment that amortises `principal` over `n` periods at `rate` per period.
///
/// PMT = P * r * (1+r)^n / ((1+r)^n - 1), or P / n when the rate is zero.
pub fn amortizing_payment(principal: Money, rate: Rate, n: u32) -> FinCalcResult<Money> {
    if n == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "n".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate.is_zero() {
        return Ok(principal / Decimal::from(n));
    }
    let factor = compound_factor(rate, n)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Err(FinCalcError::DivisionByZero {
            context: "amortizing payment annuity factor".into(),
        });
    }
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| FinCalcError::Overflow {
            context: "amortizing payment".into(),
        })
}

/// Future value of a level end-of-period annuity:
/// FV = pmt * [((1+r)^n - 1) / r]
pub fn fv_annuity(pmt: Money, rate: Rate, n: u32) -> FinCalcResult<Money> {
    let overflow = || FinCalcError::Overflow {
        context: format!("annuity future value of {pmt} over {n} periods"),
    };
    if rate.is_zero() {
        return pmt.checked_mul(Decimal::from(n)).ok_or_else(overflow);
    }
    let factor = compound_factor(rate, n)?;
    pmt.checked_mul(factor - Decimal::ONE)
        .and_then(|v| v.checked_div(rate))
        .ok_or_else(overflow)
}

/// Payment required to reach a future value via level annuity:
/// FV = pmt * [((1+r)^n - 1) / r]  =>  pmt = FV * r / ((1+r)^n - 1)
pub fn fv_annuity_payment(fv: Money, rate: Rate, n: u32) -> FinCalcResult<Money> {
    if n == 0 {
        return Err(FinCalcError::InvalidInput {
            field: "n".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if rate <= Decimal::ZERO {
        return Ok(fv / Decimal::from(n));
    }
    let factor = compound_factor(rate, n)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Ok(fv / Decimal::from(n));
    }
    fv.checked_mul(rate)
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| FinCalcError::Overflow {
            context: "annuity payment".into(),
        })
}

/// Geometric mean growth rate that turns `start` into `end` over `years`.
pub fn annualized_growth(start: Money, end: Money, years: u32) -> FinCalcResult<Rate> {
    if years == 0 || start <= Decimal::ZERO || end <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let ratio = end.checked_div(start).ok_or_else(|| FinCalcError::Overflow {
        context: format!("growth ratio {end} / {start}"),
    })?;
    let exponent = Decimal::ONE / Decimal::from(years);
    Ok(power(ratio, exponent)? - Decimal::ONE)
}
