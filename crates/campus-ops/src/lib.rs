pub mod config;
pub mod error;
pub mod registrar;
pub mod telemetry;
