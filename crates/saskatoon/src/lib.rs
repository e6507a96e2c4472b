pub mod config;
pub mod error;
pub mod harvest;
pub mod telemetry;
