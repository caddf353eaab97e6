//! Application state for Axum handlers.

use roster_core::HealthCheck;
use roster_service::UserService;
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Probes consulted by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state with no readiness probes.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self {
            user_service,
            health_checks: Vec::new(),
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module + HasComponent<dyn UserService>,
    {
        Self::new(module.resolve())
    }

    /// Adds a readiness probe.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("health_checks", &self.health_checks.len())
            .finish_non_exhaustive()
    }
}
