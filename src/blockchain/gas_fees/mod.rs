pub mod estimation;
pub mod models;
pub mod price_calculator;
