pub mod affordability;
