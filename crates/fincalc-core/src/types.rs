use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates in percent units (6.5 = 6.5%). Divided by 100 at the point of use.
pub type Percent = Decimal;

/// Rates expressed as decimals (0.05 = 5%), used once percent inputs are converted.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Outcome of a calculator call.
///
/// Each calculator reports failure its own way: some simply produce no result
/// (`Invalid`), others return a human-readable message (`Error`). Callers
/// pattern-match rather than catching anything.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    Invalid,
    Error { message: String },
}

impl<T> Outcome<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Error {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Outcome::Invalid)
    }

    /// Converts into an `Option`, discarding the failure kind.
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Error { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Convert a percent-unit value into a decimal fraction (6.5 -> 0.065).
pub fn pct(value: Percent) -> Decimal {
    value / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let ok: Outcome<ComputationOutput<Decimal>> = Outcome::Ok(with_metadata(
            "test",
            &serde_json::json!({}),
            vec![],
            0,
            dec!(1.5),
        ));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["result"], "1.5");

        let invalid: Outcome<Decimal> = Outcome::Invalid;
        assert_eq!(serde_json::to_value(&invalid).unwrap()["status"], "invalid");

        let err: Outcome<Decimal> = Outcome::error("bad dates");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "bad dates");
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: Outcome<u32> = Outcome::Ok(3);
        assert!(ok.is_ok());
        assert_eq!(ok.ok(), Some(3));

        let err: Outcome<u32> = Outcome::error("nope");
        assert_eq!(err.error_message(), Some("nope"));
        assert!(!err.is_invalid());
        assert_eq!(err.ok(), None);
    }

    #[test]
    fn test_pct_conversion() {
        assert_eq!(pct(dec!(6.5)), dec!(0.065));
        assert_eq!(pct(Decimal::ZERO), Decimal::ZERO);
    }
}
