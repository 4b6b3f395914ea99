pub mod account;
pub mod assessment;
pub mod auth;
pub mod config;
pub mod error;
pub mod remedial;
pub mod reports;
pub mod server;
pub mod subscription;
pub mod telemetry;
