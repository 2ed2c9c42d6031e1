//! Display helpers for calculator output: USD-style currency and percentages.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Percent};

/// Round a monetary amount for display: whole currency units or cents.
/// Midpoints round away from zero.
pub fn round_money(amount: Money, whole_units: bool) -> Money {
    let dp = if whole_units { 0 } else { 2 };
    amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to an arbitrary number of decimal places, midpoints away from zero.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `$1,234.57`, or `$1,235` when whole units are requested. Negatives render as `-$1,234.57`.
pub fn format_currency(amount: Money, whole_units: bool) -> String {
    let rounded = round_money(amount, whole_units);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = if whole_units {
        format!("{:.0}", rounded.abs())
    } else {
        format!("{:.2}", rounded.abs())
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (digits, None),
    };
    let grouped = group_thousands(&int_part);
    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// `6.50%`: two decimals with a trailing percent sign. Input is in percent units.
pub fn format_percent(value: Percent) -> String {
    format!("{:.2}%", round_to(value, 2))
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_cents() {
        assert_eq!(format_currency(dec!(1234.567), false), "$1,234.57");
        assert_eq!(format_currency(dec!(0.5), false), "$0.50");
        assert_eq!(format_currency(dec!(1000000), false), "$1,000,000.00");
    }

    #[test]
    fn test_format_currency_whole_units() {
        assert_eq!(format_currency(dec!(1234.5), true), "$1,235");
        assert_eq!(format_currency(dec!(999), true), "$999");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-42.125), false), "-$42.13");
        assert_eq!(format_currency(dec!(-0.001), false), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(6.5)), "6.50%");
        assert_eq!(format_percent(dec!(12.3456)), "12.35%");
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(2.345), false), dec!(2.35));
        assert_eq!(round_money(dec!(2.5), true), dec!(3));
    }
}
