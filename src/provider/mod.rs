pub mod error;
mod payload;
pub mod power_client;
pub mod sample_provider;
pub mod synthetic;
