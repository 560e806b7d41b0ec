pub mod analytics;
pub mod config;
pub mod error;
pub mod forecast;
pub mod telemetry;
