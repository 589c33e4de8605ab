//! Core traits shared across layers.

use async_trait::async_trait;

/// Trait for entities with a stable identity.
///
/// The identifier is `None` until the record has been persisted and the
/// store has assigned one.
pub trait Entity {
    /// Identifier type.
    type Id;

    /// Returns the entity's identifier, if assigned.
    fn id(&self) -> Option<&Self::Id>;

    /// Returns true if the entity has not been persisted yet.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

/// Marker trait for service layer components.
pub trait Service: Send + Sync {}

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
}
