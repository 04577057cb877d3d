pub mod percentiles;
pub mod quantity;
