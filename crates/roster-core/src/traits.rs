//! Core traits shared across layers.

use async_trait::async_trait;

/// Trait for health checks.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is degraded but functional.
    Degraded(String),
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true if the status is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns true if the status is unhealthy.
    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }

    /// Short lowercase label, as reported by the health endpoints.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded(_) => "degraded",
            Self::Unhealthy(_) => "unhealthy",
        }
    }
}
