pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "auto_finance")]
pub mod auto_finance;

#[cfg(feature = "fixed_income")]
pub mod fixed_income;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "housing")]
pub mod housing;

#[cfg(feature = "wealth")]
pub mod wealth;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all internal fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
