//! Application state for Axum handlers.

use productsearch_core::HealthCheck;
use productsearch_service::PersonService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub person_service: Arc<dyn PersonService>,
    /// Checks run by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(person_service: Arc<dyn PersonService>) -> Self {
        Self {
            person_service,
            health_checks: Vec::new(),
        }
    }

    /// Registers a readiness check.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
