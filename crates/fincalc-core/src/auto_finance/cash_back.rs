//! Cash back vs. low interest: compare two dealer financing offers.
//!
//! The rebate offer lowers the amount financed but carries the higher rate;
//! the promotional offer keeps the full price at the lower rate. Sales tax is
//! charged on the pre-rebate price in both cases.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::amortizing_payment;
use crate::types::{pct, with_metadata, ComputationOutput, Money, Outcome, Percent};
use crate::FinCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a single financing offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferTerms {
    pub price: Money,
    pub cash_back: Money,
    /// Annual loan rate in percent units
    pub interest_rate: Percent,
    pub loan_term_months: u32,
    pub down_payment: Money,
    pub trade_in_value: Money,
    /// Sales tax in percent units, applied to `price`
    pub sales_tax: Percent,
    pub fees: Money,
}

/// Evaluated cost of one offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferEvaluation {
    /// Price after the rebate
    pub net_price: Money,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub sales_tax_amount: Money,
    pub total_cost: Money,
}

/// Which offer is cheaper overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetterOption {
    CashBack,
    LowInterest,
}

/// Input for comparing a rebate offer against a low-rate offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashBackInput {
    #[serde(default)]
    pub auto_price: Money,
    #[serde(default)]
    pub cash_back_amount: Money,
    /// Rate that comes with the rebate (percent units)
    #[serde(default)]
    pub high_interest_rate: Percent,
    /// Promotional rate without the rebate (percent units)
    #[serde(default)]
    pub low_interest_rate: Percent,
    #[serde(default)]
    pub loan_term_months: u32,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    #[serde(default)]
    pub sales_tax: Percent,
    #[serde(default)]
    pub fees: Money,
}

impl Default for CashBackInput {
    fn default() -> Self {
        Self {
            auto_price: dec!(35_000),
            cash_back_amount: dec!(3_000),
            high_interest_rate: dec!(6.9),
            low_interest_rate: dec!(1.9),
            loan_term_months: 60,
            down_payment: dec!(5_000),
            trade_in_value: Decimal::ZERO,
            sales_tax: dec!(7),
            fees: dec!(500),
        }
    }
}

impl CashBackInput {
    pub fn cash_back_offer(&self) -> OfferTerms {
        self.offer(self.cash_back_amount, self.high_interest_rate)
    }

    pub fn low_interest_offer(&self) -> OfferTerms {
        self.offer(Decimal::ZERO, self.low_interest_rate)
    }

    fn offer(&self, cash_back: Money, interest_rate: Percent) -> OfferTerms {
        OfferTerms {
            price: self.auto_price,
            cash_back,
            interest_rate,
            loan_term_months: self.loan_term_months,
            down_payment: self.down_payment,
            trade_in_value: self.trade_in_value,
            sales_tax: self.sales_tax,
            fees: self.fees,
        }
    }
}

/// Side-by-side comparison result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashBackOutput {
    pub cash_back_offer: OfferEvaluation,
    pub low_interest_offer: OfferEvaluation,
    pub better_option: BetterOption,
    pub savings_amount: Money,
    /// Cash back monthly payment minus low-interest monthly payment
    pub monthly_payment_difference: Money,
    /// Cash back total interest minus low-interest total interest
    pub interest_difference: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a single financing offer.
///
/// `total_cost = price + total_interest + sales_tax + fees`, with tax on the
/// full price regardless of any rebate. The rebate only shows up through the
/// smaller loan and its interest; `net_price` is reported for display. A loan
/// amount that would go negative (rebate plus down payment above the price) is
/// floored at zero.
pub fn evaluate_offer(terms: &OfferTerms) -> FinCalcResult<OfferEvaluation> {
    let net_price = terms.price - terms.cash_back;
    let loan_amount =
        (net_price - terms.down_payment - terms.trade_in_value).max(Decimal::ZERO);
    let monthly_rate = pct(terms.interest_rate) / MONTHS_PER_YEAR;
    let monthly_payment = amortizing_payment(loan_amount, monthly_rate, terms.loan_term_months)?;
    let total_interest = monthly_payment * Decimal::from(terms.loan_term_months) - loan_amount;
    let sales_tax_amount = terms.price * pct(terms.sales_tax);
    let total_cost = terms.price + total_interest + sales_tax_amount + terms.fees;

    Ok(OfferEvaluation {
        net_price,
        loan_amount,
        monthly_payment,
        total_interest,
        sales_tax_amount,
        total_cost,
    })
}

/// Compare the rebate offer with the low-interest offer.
///
/// Returns [`Outcome::Invalid`] unless the price is positive and the term is
/// non-zero. Ties go to the low-interest offer.
pub fn compare_offers(input: &CashBackInput) -> Outcome<ComputationOutput<CashBackOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.auto_price <= Decimal::ZERO || input.loan_term_months == 0 {
        return Outcome::Invalid;
    }

    let (cash_back_offer, low_interest_offer) = match (
        evaluate_offer(&input.cash_back_offer()),
        evaluate_offer(&input.low_interest_offer()),
    ) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(error = %e, "offer evaluation failed");
            return Outcome::Invalid;
        }
    };

    let better_option = if cash_back_offer.total_cost < low_interest_offer.total_cost {
        BetterOption::CashBack
    } else {
        BetterOption::LowInterest
    };
    let savings_amount = (cash_back_offer.total_cost - low_interest_offer.total_cost).abs();

    if input.cash_back_amount + input.down_payment + input.trade_in_value > input.auto_price {
        warnings.push("Rebate and down payment exceed the price; nothing is financed".into());
    }
    if input.low_interest_rate > input.high_interest_rate {
        warnings.push("Low-interest offer carries the higher rate".into());
    }

    let output = CashBackOutput {
        monthly_payment_difference: cash_back_offer.monthly_payment
            - low_interest_offer.monthly_payment,
        interest_difference: cash_back_offer.total_interest - low_interest_offer.total_interest,
        cash_back_offer,
        low_interest_offer,
        better_option,
        savings_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Outcome::Ok(with_metadata(
        "Cash back vs. low interest — amortised total cost of each offer",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
