//! # Roster REST
//!
//! REST API layer using Axum for Roster.
//! Exposes the user resource under `/api/users`, health probes, and the
//! generated OpenAPI document with its Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
