//! # Roster Config
//!
//! Configuration management for Roster.
//! Supports layered configuration from TOML files, a `.env` file,
//! and `ROSTER__`-prefixed environment variables.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
