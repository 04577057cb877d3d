pub mod gas_fees;
pub mod providers;
