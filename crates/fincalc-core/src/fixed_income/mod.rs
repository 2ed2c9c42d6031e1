pub mod accrued;
pub mod bonds;
