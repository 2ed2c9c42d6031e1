use fincalc_core::depreciation::schedule::{
    calculate_depreciation, DepreciationInput, DepreciationMethod,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const METHODS: [DepreciationMethod; 3] = [
    DepreciationMethod::StraightLine,
    DepreciationMethod::DecliningBalance,
    DepreciationMethod::SumOfYearsDigits,
];

fn input(method: DepreciationMethod) -> DepreciationInput {
    DepreciationInput {
        method,
        ..DepreciationInput::default()
    }
}

// ===========================================================================
// Conservation: last accumulated depreciation equals cost - salvage
// ===========================================================================

#[test]
fn test_conservation_full_years() {
    for method in METHODS {
        for life in [1u32, 3, 5, 7, 10, 27] {
            let out = calculate_depreciation(&DepreciationInput {
                asset_cost: dec!(48_317.55),
                salvage_value: dec!(2_500),
                useful_life_years: life,
                ..input(method)
            })
            .result;
            let last = out.schedule.last().unwrap();
            assert!(
                (last.accumulated_depreciation - dec!(45_817.55)).abs() <= dec!(0.005),
                "{method:?} life={life} got {}",
                last.accumulated_depreciation
            );
            assert_eq!(last.ending_book_value, dec!(2_500));
        }
    }
}

#[test]
fn test_conservation_partial_first_year() {
    for method in METHODS {
        for months in 1..=12u32 {
            let out = calculate_depreciation(&DepreciationInput {
                partial_first_year: true,
                months_in_first_year: months,
                ..input(method)
            })
            .result;
            let last = out.schedule.last().unwrap();
            assert!(
                (last.accumulated_depreciation - dec!(10_000)).abs() <= dec!(0.005),
                "{method:?} months={months}"
            );
        }
    }
}

#[test]
fn test_conservation_whole_units() {
    for method in METHODS {
        for months in [3u32, 7, 12] {
            let out = calculate_depreciation(&DepreciationInput {
                asset_cost: dec!(12_345.67),
                salvage_value: dec!(1_234.56),
                useful_life_years: 7,
                round_to_whole_units: true,
                partial_first_year: true,
                months_in_first_year: months,
                ..input(method)
            })
            .result;
            let last = out.schedule.last().unwrap();
            assert!((last.accumulated_depreciation - dec!(11_111.11)).abs() <= dec!(0.5));
            for row in &out.schedule {
                assert_eq!(row.depreciation_expense.fract(), Decimal::ZERO);
            }
        }
    }
}

// ===========================================================================
// Declining balance never goes below salvage
// ===========================================================================

#[test]
fn test_declining_balance_floor_at_salvage() {
    for factor in [dec!(1), dec!(1.5), dec!(2), dec!(2.5), dec!(3)] {
        for life in 1..=50u32 {
            let out = calculate_depreciation(&DepreciationInput {
                declining_factor: factor,
                useful_life_years: life,
                ..input(DepreciationMethod::DecliningBalance)
            })
            .result;
            assert!(!out.schedule.is_empty());
            assert!(out.schedule.len() <= life as usize);
            for row in &out.schedule {
                assert!(
                    row.ending_book_value >= dec!(1_000),
                    "factor={factor} life={life} period={}",
                    row.period
                );
                assert!(row.depreciation_expense >= Decimal::ZERO);
            }
        }
    }
}

#[test]
fn test_declining_balance_stops_early_when_salvage_reached() {
    // Rate 3/2 = 150% would overshoot in year one; the cap binds immediately
    let out = calculate_depreciation(&DepreciationInput {
        declining_factor: dec!(3),
        useful_life_years: 2,
        ..input(DepreciationMethod::DecliningBalance)
    })
    .result;
    assert_eq!(out.schedule.len(), 1);
    assert_eq!(out.schedule[0].depreciation_expense, dec!(10_000));
}

// ===========================================================================
// Row continuity
// ===========================================================================

#[test]
fn test_rows_chain_book_values() {
    for method in METHODS {
        let out = calculate_depreciation(&DepreciationInput {
            partial_first_year: true,
            months_in_first_year: 4,
            ..input(method)
        })
        .result;
        let rows = &out.schedule;
        assert_eq!(rows[0].beginning_book_value, dec!(11_000));
        for pair in rows.windows(2) {
            assert_eq!(pair[0].ending_book_value, pair[1].beginning_book_value);
            assert_eq!(pair[0].period + 1, pair[1].period);
        }
    }
}
