pub mod college;
pub mod compound_interest;
