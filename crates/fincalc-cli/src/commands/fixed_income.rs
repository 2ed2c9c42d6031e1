use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::fixed_income::accrued::{self, AccruedInterestInput, DayCountConvention};
use fincalc_core::fixed_income::bonds::{self, BondInput, BondSolveFor, CouponFrequency};

use super::outcome_to_value;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Annually,
    Semiannually,
    Quarterly,
    Monthly,
}

impl From<FrequencyArg> for CouponFrequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Annually => CouponFrequency::Annually,
            FrequencyArg::Semiannually => CouponFrequency::Semiannually,
            FrequencyArg::Quarterly => CouponFrequency::Quarterly,
            FrequencyArg::Monthly => CouponFrequency::Monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DayCountArg {
    #[value(name = "30-360")]
    Thirty360,
    #[value(name = "act-360")]
    Actual360,
    #[value(name = "act-365")]
    Actual365,
    #[value(name = "act-act")]
    ActualActual,
}

impl From<DayCountArg> for DayCountConvention {
    fn from(d: DayCountArg) -> Self {
        match d {
            DayCountArg::Thirty360 => DayCountConvention::Thirty360,
            DayCountArg::Actual360 => DayCountConvention::Actual360,
            DayCountArg::Actual365 => DayCountConvention::Actual365,
            DayCountArg::ActualActual => DayCountConvention::ActualActual,
        }
    }
}

/// Arguments for bond price / yield analysis
#[derive(Args)]
pub struct BondArgs {
    /// Face (par) value
    #[arg(long)]
    pub face_value: Option<Decimal>,

    /// Annual coupon rate in percent
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Coupon frequency
    #[arg(long, value_enum)]
    pub frequency: Option<FrequencyArg>,

    /// Years to maturity (fractions allowed)
    #[arg(long)]
    pub years_to_maturity: Option<Decimal>,

    /// Price the bond at this annual yield, in percent
    #[arg(long = "yield", conflicts_with = "price")]
    pub yield_rate: Option<Decimal>,

    /// Solve the yield to maturity for this price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// First date of the cash-flow schedule (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub schedule_start: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for accrued interest and clean / dirty price
#[derive(Args)]
pub struct AccruedArgs {
    /// Face (par) value
    #[arg(long)]
    pub face_value: Option<Decimal>,

    /// Annual coupon rate in percent
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Annual yield in percent
    #[arg(long = "yield")]
    pub yield_rate: Option<Decimal>,

    /// Coupon frequency
    #[arg(long, value_enum)]
    pub frequency: Option<FrequencyArg>,

    /// Settlement date (YYYY-MM-DD)
    #[arg(long)]
    pub settlement_date: Option<String>,

    /// Maturity date (YYYY-MM-DD)
    #[arg(long)]
    pub maturity_date: Option<String>,

    /// Day count convention
    #[arg(long, value_enum)]
    pub day_count: Option<DayCountArg>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_bond(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input: BondInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = BondInput::default();
            let solve_for = match (args.price, args.yield_rate) {
                (Some(price), _) => BondSolveFor::Yield { price },
                (None, Some(yield_rate)) => BondSolveFor::Price { yield_rate },
                (None, None) => d.solve_for,
            };
            BondInput {
                face_value: args.face_value.unwrap_or(d.face_value),
                coupon_rate: args.coupon_rate.unwrap_or(d.coupon_rate),
                frequency: args.frequency.map(Into::into).unwrap_or(d.frequency),
                years_to_maturity: args.years_to_maturity.unwrap_or(d.years_to_maturity),
                solve_for,
                schedule_start: args.schedule_start,
            }
        }
    };
    outcome_to_value(bonds::calculate_bond(&bond_input))
}

pub fn run_accrued_interest(args: AccruedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let accrued_input: AccruedInterestInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = AccruedInterestInput::default();
            AccruedInterestInput {
                face_value: args.face_value.unwrap_or(d.face_value),
                coupon_rate: args.coupon_rate.unwrap_or(d.coupon_rate),
                yield_rate: args.yield_rate.unwrap_or(d.yield_rate),
                frequency: args.frequency.map(Into::into).unwrap_or(d.frequency),
                settlement_date: args.settlement_date.unwrap_or(d.settlement_date),
                maturity_date: args.maturity_date.unwrap_or(d.maturity_date),
                day_count: args.day_count.map(Into::into).unwrap_or(d.day_count),
            }
        }
    };
    outcome_to_value(accrued::calculate_accrued_interest(&accrued_input))
}
