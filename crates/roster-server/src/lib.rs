//! # Roster Server Library
//!
//! Wires configuration, logging, the Shaku module, and the HTTP listener
//! into a runnable server.

pub mod app;
pub mod di;
pub mod logging;
pub mod startup;
