//! # Roster Domain
//!
//! Domain entities for Roster. The `User` record is the only resource.

pub mod entities;

pub use entities::*;
