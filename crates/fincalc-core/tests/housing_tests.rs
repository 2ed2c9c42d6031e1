use fincalc_core::housing::affordability::{
    calculate_affordability, monthly_cost, AffordabilityInput, AffordabilityMode, LoanProgram,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn income(program: LoanProgram) -> AffordabilityInput {
    AffordabilityInput {
        mode: AffordabilityMode::Income {
            annual_income: dec!(100_000),
            monthly_debts: dec!(500),
            loan_program: program,
        },
        ..AffordabilityInput::default()
    }
}

fn max_price(input: &AffordabilityInput) -> Decimal {
    calculate_affordability(input)
        .ok()
        .unwrap()
        .result
        .max_home_price
}

#[test]
fn test_program_ordering() {
    let conventional = max_price(&income(LoanProgram::Conventional));
    let fha = max_price(&income(LoanProgram::Fha));
    let va = max_price(&income(LoanProgram::Va));
    // FHA front-end 31% > 28%; VA is limited only by 41% back-end less debts
    assert!(fha > conventional);
    assert!(va > fha);
}

#[test]
fn test_higher_rate_lowers_price() {
    let base = max_price(&income(LoanProgram::Conventional));
    let expensive = max_price(&AffordabilityInput {
        interest_rate: dec!(8.5),
        ..income(LoanProgram::Conventional)
    });
    assert!(expensive < base);
}

#[test]
fn test_hoa_lowers_price() {
    let base = max_price(&income(LoanProgram::Conventional));
    let with_hoa = max_price(&AffordabilityInput {
        hoa_monthly: dec!(350),
        ..income(LoanProgram::Conventional)
    });
    assert!(with_hoa < base);
}

#[test]
fn test_result_is_consistent_with_monthly_cost() {
    let input = AffordabilityInput {
        mode: AffordabilityMode::Budget {
            monthly_budget: dec!(2_750),
        },
        down_payment_percent: dec!(5),
        hoa_monthly: dec!(120),
        ..AffordabilityInput::default()
    };
    let out = calculate_affordability(&input).ok().unwrap().result;
    let recomputed = monthly_cost(&input, out.max_home_price).unwrap();
    assert_eq!(recomputed, out.monthly_costs);
    assert!(out.converged);
    assert!((out.monthly_costs.total - dec!(2_750)).abs() < dec!(10));
    assert!(out.monthly_costs.pmi > Decimal::ZERO);
    assert_eq!(out.monthly_costs.hoa, dec!(120));
    assert_eq!(out.down_payment_amount + out.loan_amount, out.max_home_price);
}

#[test]
fn test_realised_ratios_respect_limits() {
    for program in [LoanProgram::Conventional, LoanProgram::Fha, LoanProgram::Custom(dec!(33))] {
        let out = calculate_affordability(&income(program)).ok().unwrap().result;
        let (front_limit, back_limit) = program.dti_limits();
        // Gap tolerance of $10 on $8,333 monthly income is ~0.12 points
        let slack = dec!(0.15);
        assert!(out.back_end_ratio.unwrap() <= back_limit + slack);
        if let Some(front) = front_limit {
            assert!(out.front_end_ratio.unwrap() <= front + slack);
        }
    }
}

#[test]
fn test_zero_interest_rate_is_supported() {
    let out = calculate_affordability(&AffordabilityInput {
        interest_rate: Decimal::ZERO,
        ..income(LoanProgram::Conventional)
    })
    .ok()
    .unwrap()
    .result;
    assert!(out.max_home_price > Decimal::ZERO);
}
