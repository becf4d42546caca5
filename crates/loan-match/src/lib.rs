pub mod config;
pub mod error;
pub mod intake;
pub mod matching;
pub mod telemetry;
