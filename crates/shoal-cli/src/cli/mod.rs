pub mod command;
pub mod config;
pub mod console;
pub mod session;
pub mod telemetry;
