//! # Roster Service
//!
//! Business logic service layer for Roster.
//! Validates user input, enforces email uniqueness, hashes passwords, and
//! translates repository outcomes into the public user representation.

pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use dto::*;
pub use r#impl::*;
pub use user_service::*;
