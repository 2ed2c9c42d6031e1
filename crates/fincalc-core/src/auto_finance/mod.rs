pub mod cash_back;
pub mod lease;
