use fincalc_core::auto_finance::{cash_back, lease};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Lease tests
// ===========================================================================

#[test]
fn test_lease_identities_hold_across_inputs() {
    let prices = [dec!(18_500), dec!(32_999.99), dec!(50_000), dec!(87_250)];
    let terms = [12u32, 24, 36, 39, 48];
    let factors = [dec!(0.00001), dec!(0.00125), dec!(0.00208), dec!(0.01)];

    for &price in &prices {
        for &term in &terms {
            for &money_factor in &factors {
                let input = lease::LeaseInput {
                    auto_price: price,
                    lease_term_months: term,
                    money_factor,
                    down_payment: dec!(2_000),
                    trade_in_value: dec!(1_500),
                    sales_tax: dec!(8.25),
                    residual_value: price * dec!(0.55),
                };
                let out = lease::calculate_lease(&input).ok().unwrap().result;
                assert_eq!(
                    out.monthly_payment * Decimal::from(term),
                    out.total_lease_payments
                );
                assert_eq!(out.upfront_cost + out.total_lease_payments, out.total_cost);
            }
        }
    }
}

#[test]
fn test_lease_default_scenario() {
    let out = lease::calculate_lease(&lease::LeaseInput::default())
        .ok()
        .unwrap()
        .result;
    assert_eq!(out.capitalized_cost, dec!(40_000));
    assert_eq!(out.depreciation, dec!(16_000));
    assert_eq!(out.monthly_interest, dec!(133.12));
    assert!((out.monthly_payment - dec!(617.97)).abs() < dec!(0.05));
}

#[test]
fn test_lease_output_serializes_with_status() {
    let outcome = lease::calculate_lease(&lease::LeaseInput::default());
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["result"]["monthly_payment"].is_string());

    let invalid = lease::calculate_lease(&lease::LeaseInput {
        lease_term_months: 0,
        ..lease::LeaseInput::default()
    });
    assert_eq!(serde_json::to_value(&invalid).unwrap()["status"], "invalid");
}

// ===========================================================================
// Cash back vs. low interest tests
// ===========================================================================

fn offer(cash_back: Decimal, rate: Decimal) -> cash_back::OfferTerms {
    cash_back::OfferTerms {
        price: dec!(35_000),
        cash_back,
        interest_rate: rate,
        loan_term_months: 60,
        down_payment: dec!(5_000),
        trade_in_value: Decimal::ZERO,
        sales_tax: dec!(7),
        fees: dec!(500),
    }
}

#[test]
fn test_cost_difference_is_interest_only() {
    let a = cash_back::evaluate_offer(&offer(dec!(3_000), dec!(6.9))).unwrap();
    let b = cash_back::evaluate_offer(&offer(Decimal::ZERO, dec!(1.9))).unwrap();
    // Both offers pay the full price, tax and fees; the rebate only shrinks the loan
    let diff = (a.total_cost - b.total_cost) - (a.total_interest - b.total_interest);
    assert!(diff.abs() < dec!(0.000001));
    assert_eq!(a.net_price, dec!(32_000));
    assert_eq!(a.loan_amount, dec!(27_000));
}

#[test]
fn test_default_offers_low_interest_saves_about_3530() {
    let out = cash_back::compare_offers(&cash_back::CashBackInput::default())
        .ok()
        .unwrap()
        .result;
    assert_eq!(out.better_option, cash_back::BetterOption::LowInterest);
    assert!((out.cash_back_offer.total_cost - dec!(42_951.56)).abs() < dec!(0.01));
    assert!((out.low_interest_offer.total_cost - dec!(39_421.29)).abs() < dec!(0.01));
    assert!((out.savings_amount - dec!(3_530.28)).abs() < dec!(0.01));
}

#[test]
fn test_offer_order_does_not_change_the_winner() {
    let scenarios = [
        (dec!(3_000), dec!(6.9), dec!(1.9)),
        (dec!(8_000), dec!(3.0), dec!(1.9)),
        (dec!(500), dec!(4.5), dec!(0)),
        (dec!(4_000), dec!(2.9), dec!(0.9)),
    ];
    for (rebate, high, low) in scenarios {
        let rebate_offer = cash_back::evaluate_offer(&offer(rebate, high)).unwrap();
        let low_offer = cash_back::evaluate_offer(&offer(Decimal::ZERO, low)).unwrap();

        let input = cash_back::CashBackInput {
            cash_back_amount: rebate,
            high_interest_rate: high,
            low_interest_rate: low,
            ..cash_back::CashBackInput::default()
        };
        let out = cash_back::compare_offers(&input).ok().unwrap().result;

        let expected = if rebate_offer.total_cost < low_offer.total_cost {
            cash_back::BetterOption::CashBack
        } else {
            cash_back::BetterOption::LowInterest
        };
        assert_eq!(out.better_option, expected);
        assert_eq!(
            out.savings_amount,
            (rebate_offer.total_cost - low_offer.total_cost).abs()
        );
    }
}

#[test]
fn test_identical_offers_tie_to_low_interest() {
    let input = cash_back::CashBackInput {
        cash_back_amount: Decimal::ZERO,
        high_interest_rate: dec!(4),
        low_interest_rate: dec!(4),
        ..cash_back::CashBackInput::default()
    };
    let out = cash_back::compare_offers(&input).ok().unwrap().result;
    assert_eq!(out.savings_amount, Decimal::ZERO);
    assert_eq!(out.better_option, cash_back::BetterOption::LowInterest);
}
