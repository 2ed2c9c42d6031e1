use fincalc_core::wealth::{college, compound_interest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// College cost tests
// ===========================================================================

#[test]
fn test_college_default_plan() {
    let out = college::project_college_cost(&college::CollegeCostInput::default())
        .ok()
        .unwrap()
        .result;
    // 40,722.37 * (1 + 1.05 + 1.05^2 + 1.05^3)
    assert!((out.total_cost - dec!(175_518.5)).abs() < dec!(1));
    assert!(out.monthly_contribution > dec!(1_000) && out.monthly_contribution < dec!(1_040));
    assert!(out.funded_percent > dec!(9) && out.funded_percent < dec!(10));
}

#[test]
fn test_college_goal_scales_required_savings() {
    let full = college::project_college_cost(&college::CollegeCostInput::default())
        .ok()
        .unwrap()
        .result;
    let half = college::project_college_cost(&college::CollegeCostInput {
        savings_percent_goal: dec!(50),
        ..college::CollegeCostInput::default()
    })
    .ok()
    .unwrap()
    .result;
    assert_eq!(half.required_savings * dec!(2), full.required_savings);
    assert!(half.monthly_contribution < full.monthly_contribution);
}

#[test]
fn test_college_error_result_serializes_message() {
    let outcome = college::project_college_cost(&college::CollegeCostInput {
        duration_years: -2,
        ..college::CollegeCostInput::default()
    });
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().unwrap().contains("duration"));
}

// ===========================================================================
// Compound interest tests
// ===========================================================================

#[test]
fn test_annual_schedule_matches_summary() {
    let out = compound_interest::project_compound_interest(
        &compound_interest::CompoundInterestInput {
            tax_rate: dec!(15),
            contribution_growth_rate: dec!(2),
            ..compound_interest::CompoundInterestInput::default()
        },
    )
    .ok()
    .unwrap()
    .result;

    let last = out.annual_schedule.last().unwrap();
    assert_eq!(last.balance, out.final_amount);
    assert_eq!(last.total_contributions, out.total_contributions);

    let taxes: Decimal = out.annual_schedule.iter().map(|r| r.tax_paid).sum();
    assert_eq!(taxes, out.total_taxes_paid);
    let interest: Decimal = out.annual_schedule.iter().map(|r| r.interest_earned).sum();
    assert_eq!(interest, out.total_interest_earned);
}

#[test]
fn test_monthly_and_annual_agree_for_lump_sum_monthly_compounding() {
    let out = compound_interest::project_compound_interest(
        &compound_interest::CompoundInterestInput {
            monthly_contribution: Decimal::ZERO,
            ..compound_interest::CompoundInterestInput::default()
        },
    )
    .ok()
    .unwrap()
    .result;
    let monthly_final = out.monthly_schedule.last().unwrap().balance;
    assert!((monthly_final - out.final_amount).abs() < dec!(0.000001));
}

#[test]
fn test_default_projection_magnitude() {
    let out = compound_interest::project_compound_interest(
        &compound_interest::CompoundInterestInput::default(),
    )
    .ok()
    .unwrap()
    .result;
    // 10k plus 6k/yr deposited at the start of each year, 7% monthly compounding
    assert!(out.final_amount > dec!(300_000) && out.final_amount < dec!(320_000));
    assert!(out.effective_annual_rate > Decimal::ZERO);
    assert!(out.real_return < out.effective_annual_rate);
    assert_eq!(out.total_taxes_paid, Decimal::ZERO);
    assert_eq!(out.after_tax_amount, out.final_amount);
}

#[test]
fn test_tax_deferred_beats_annual_tax() {
    let base = compound_interest::CompoundInterestInput {
        tax_rate: dec!(25),
        ..compound_interest::CompoundInterestInput::default()
    };
    let taxed = compound_interest::project_compound_interest(&base)
        .ok()
        .unwrap()
        .result;
    let deferred = compound_interest::project_compound_interest(
        &compound_interest::CompoundInterestInput {
            tax_deferred: true,
            ..base
        },
    )
    .ok()
    .unwrap()
    .result;
    assert!(deferred.after_tax_amount > taxed.after_tax_amount);
}

#[test]
fn test_extreme_inputs_report_errors_instead_of_panicking() {
    let doubling_contributions = compound_interest::CompoundInterestInput {
        annual_interest_rate: Decimal::ZERO,
        contribution_growth_rate: dec!(100),
        investment_length_years: 95,
        ..compound_interest::CompoundInterestInput::default()
    };
    let outcome = compound_interest::project_compound_interest(&doubling_contributions);
    assert!(outcome.error_message().is_some());

    let hyperinflation = college::CollegeCostInput {
        inflation_rate: dec!(5_000),
        years_until_college: 30,
        ..college::CollegeCostInput::default()
    };
    assert!(college::project_college_cost(&hyperinflation)
        .error_message()
        .is_some());
}
