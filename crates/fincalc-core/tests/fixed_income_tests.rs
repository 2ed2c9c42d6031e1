use chrono::NaiveDate;
use fincalc_core::fixed_income::{accrued, bonds};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Bond price / yield tests
// ===========================================================================

#[test]
fn test_bond_price_worked_example() {
    let out = bonds::calculate_bond(&bonds::BondInput::default())
        .ok()
        .unwrap()
        .result;
    // 5% semiannual coupon, 6% yield, 10 years
    assert!((out.price - dec!(925.61)).abs() < dec!(0.01));
    assert!((out.current_yield - dec!(5.4018)).abs() < dec!(0.001));
    assert_eq!(out.total_coupons, dec!(500));
}

#[test]
fn test_price_then_yield_recovers_yield() {
    let frequencies = [
        bonds::CouponFrequency::Annually,
        bonds::CouponFrequency::Semiannually,
        bonds::CouponFrequency::Quarterly,
        bonds::CouponFrequency::Monthly,
    ];
    for frequency in frequencies {
        for coupon in [dec!(0), dec!(5), dec!(8)] {
            for yield_rate in [dec!(2), dec!(6), dec!(12)] {
                for years in [dec!(1), dec!(5), dec!(30)] {
                    let priced = bonds::calculate_bond(&bonds::BondInput {
                        coupon_rate: coupon,
                        frequency,
                        years_to_maturity: years,
                        solve_for: bonds::BondSolveFor::Price { yield_rate },
                        ..bonds::BondInput::default()
                    })
                    .ok()
                    .unwrap()
                    .result;

                    let solved = bonds::calculate_bond(&bonds::BondInput {
                        coupon_rate: coupon,
                        frequency,
                        years_to_maturity: years,
                        solve_for: bonds::BondSolveFor::Yield {
                            price: priced.price,
                        },
                        ..bonds::BondInput::default()
                    })
                    .ok()
                    .unwrap()
                    .result;

                    assert!(solved.converged);
                    // percent units: 1e-4 as a decimal is 0.01 here
                    assert!(
                        (solved.yield_to_maturity - yield_rate).abs() < dec!(0.01),
                        "coupon={coupon} yield={yield_rate} years={years} freq={frequency:?} got={}",
                        solved.yield_to_maturity
                    );
                }
            }
        }
    }
}

#[test]
fn test_premium_bond_has_yield_below_coupon() {
    let out = bonds::calculate_bond(&bonds::BondInput {
        solve_for: bonds::BondSolveFor::Yield { price: dec!(1_050) },
        ..bonds::BondInput::default()
    })
    .ok()
    .unwrap()
    .result;
    assert_eq!(out.price_status, bonds::PriceStatus::Premium);
    assert!(out.yield_to_maturity < dec!(5));
    assert!(out.iterations > 0);
}

#[test]
fn test_fractional_maturity() {
    let out = bonds::calculate_bond(&bonds::BondInput {
        years_to_maturity: dec!(2.25),
        schedule_start: NaiveDate::from_ymd_opt(2025, 1, 1),
        ..bonds::BondInput::default()
    })
    .ok()
    .unwrap()
    .result;
    // 4.5 periods: 4 whole coupons, principal on the fifth row
    assert_eq!(out.periods, dec!(4.5));
    assert_eq!(out.cash_flows.len(), 5);
    assert_eq!(out.cash_flows[4].principal_payment, dec!(1000));
    assert!(out.price > Decimal::ZERO);
}

// ===========================================================================
// Accrued interest tests
// ===========================================================================

#[test]
fn test_accrued_interest_default_record() {
    let out = accrued::calculate_accrued_interest(&accrued::AccruedInterestInput::default())
        .ok()
        .unwrap()
        .result;
    assert_eq!(out.coupon_payment, dec!(25));
    assert_eq!(out.days_in_period, dec!(180));
    assert_eq!(out.dirty_price, out.clean_price + out.accrued_interest);
    assert!(out.clean_price < dec!(1000));
}

#[test]
fn test_accrued_interest_conventions_differ() {
    let base = accrued::AccruedInterestInput {
        settlement_date: "2029-07-01".into(),
        maturity_date: "2030-01-01".into(),
        frequency: bonds::CouponFrequency::Annually,
        ..accrued::AccruedInterestInput::default()
    };
    let accrued_for = |day_count| {
        accrued::calculate_accrued_interest(&accrued::AccruedInterestInput {
            day_count,
            ..base.clone()
        })
        .ok()
        .unwrap()
        .result
        .accrued_interest
    };
    let a360 = accrued_for(accrued::DayCountConvention::Actual360);
    let a365 = accrued_for(accrued::DayCountConvention::Actual365);
    // 181 actual days
    assert!((a360 - dec!(25.1389)).abs() < dec!(0.0001));
    assert!(a360 > a365);
}

#[test]
fn test_accrued_interest_error_messages() {
    let same_day = accrued::AccruedInterestInput {
        settlement_date: "2030-01-01".into(),
        maturity_date: "2030-01-01".into(),
        ..accrued::AccruedInterestInput::default()
    };
    assert_eq!(
        accrued::calculate_accrued_interest(&same_day).error_message(),
        Some("Settlement date must be before maturity date.")
    );

    let garbage = accrued::AccruedInterestInput {
        maturity_date: "not a date".into(),
        ..accrued::AccruedInterestInput::default()
    };
    assert_eq!(
        accrued::calculate_accrued_interest(&garbage).error_message(),
        Some("Unable to calculate. Please verify your inputs.")
    );
}
