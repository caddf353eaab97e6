//! # Roster Security
//!
//! Password hashing for Roster. Plaintext passwords never leave this crate;
//! callers store and compare argon2 PHC strings only.

pub mod password;

pub use password::*;
