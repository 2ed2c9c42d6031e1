use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),
}

impl From<chrono::ParseError> for FinCalcError {
    fn from(e: chrono::ParseError) -> Self {
        FinCalcError::DateError(e.to_string())
    }
}
