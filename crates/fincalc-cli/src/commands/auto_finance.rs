use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::auto_finance::cash_back::{self, CashBackInput};
use fincalc_core::auto_finance::lease::{self, LeaseInput};

use super::outcome_to_value;
use crate::input;

/// Arguments for an auto lease quote. Unset flags keep the default quote.
#[derive(Args)]
pub struct LeaseArgs {
    /// Negotiated vehicle price
    #[arg(long)]
    pub auto_price: Option<Decimal>,

    /// Lease term in months
    #[arg(long, alias = "term")]
    pub lease_term_months: Option<u32>,

    /// Money factor as a decimal (e.g. 0.00208)
    #[arg(long, alias = "mf")]
    pub money_factor: Option<Decimal>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Trade-in value
    #[arg(long)]
    pub trade_in_value: Option<Decimal>,

    /// Sales tax in percent (e.g. 7 for 7%)
    #[arg(long)]
    pub sales_tax: Option<Decimal>,

    /// Residual value at lease end
    #[arg(long)]
    pub residual_value: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the cash back vs. low interest comparison
#[derive(Args)]
pub struct CashBackArgs {
    /// Vehicle price before any rebate
    #[arg(long)]
    pub auto_price: Option<Decimal>,

    /// Rebate offered with the standard rate
    #[arg(long, alias = "rebate")]
    pub cash_back_amount: Option<Decimal>,

    /// Rate that comes with the rebate, in percent
    #[arg(long)]
    pub high_interest_rate: Option<Decimal>,

    /// Promotional rate without the rebate, in percent
    #[arg(long)]
    pub low_interest_rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, alias = "term")]
    pub loan_term_months: Option<u32>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Trade-in value
    #[arg(long)]
    pub trade_in_value: Option<Decimal>,

    /// Sales tax in percent, charged on the pre-rebate price
    #[arg(long)]
    pub sales_tax: Option<Decimal>,

    /// Title, registration and dealer fees
    #[arg(long)]
    pub fees: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_lease(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lease_input: LeaseInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = LeaseInput::default();
            LeaseInput {
                auto_price: args.auto_price.unwrap_or(d.auto_price),
                lease_term_months: args.lease_term_months.unwrap_or(d.lease_term_months),
                money_factor: args.money_factor.unwrap_or(d.money_factor),
                down_payment: args.down_payment.unwrap_or(d.down_payment),
                trade_in_value: args.trade_in_value.unwrap_or(d.trade_in_value),
                sales_tax: args.sales_tax.unwrap_or(d.sales_tax),
                residual_value: args.residual_value.unwrap_or(d.residual_value),
            }
        }
    };
    outcome_to_value(lease::calculate_lease(&lease_input))
}

pub fn run_cash_back(args: CashBackArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cb_input: CashBackInput = match input::read_structured(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let d = CashBackInput::default();
            CashBackInput {
                auto_price: args.auto_price.unwrap_or(d.auto_price),
                cash_back_amount: args.cash_back_amount.unwrap_or(d.cash_back_amount),
                high_interest_rate: args.high_interest_rate.unwrap_or(d.high_interest_rate),
                low_interest_rate: args.low_interest_rate.unwrap_or(d.low_interest_rate),
                loan_term_months: args.loan_term_months.unwrap_or(d.loan_term_months),
                down_payment: args.down_payment.unwrap_or(d.down_payment),
                trade_in_value: args.trade_in_value.unwrap_or(d.trade_in_value),
                sales_tax: args.sales_tax.unwrap_or(d.sales_tax),
                fees: args.fees.unwrap_or(d.fees),
            }
        }
    };
    outcome_to_value(cash_back::compare_offers(&cb_input))
}
