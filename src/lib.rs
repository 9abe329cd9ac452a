pub mod config;
pub mod context;
pub mod error;
pub mod link;
pub mod models;
pub mod preview;
pub mod telemetry;
pub mod text;
