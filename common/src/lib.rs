pub mod config;
pub mod deserializers;
