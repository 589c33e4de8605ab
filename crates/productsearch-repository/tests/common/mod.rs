//! Common test infrastructure for database integration tests.

#![allow(dead_code)]

use productsearch_config::DatabaseConfig;
use productsearch_repository::{
    mappings, DatabasePool, DatabasePoolInterface, EntityMapping, SessionFactory,
};
use std::sync::Arc;

/// In-memory SQLite database.
///
/// Each instance owns a private database on a single pooled connection, so
/// tests never share state.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    /// Creates a database with the tables of the domain mappings.
    pub async fn new() -> Self {
        Self::with_mappings(&mappings::all()).await
    }

    /// Creates a database with the tables of the given mappings.
    pub async fn with_mappings(mappings: &[&'static EntityMapping]) -> Self {
        let pool = DatabasePool::new(&DatabaseConfig::sqlite_in_memory())
            .await
            .expect("Failed to open in-memory database");

        pool.ensure_schema(mappings)
            .await
            .expect("Failed to create schema");

        Self {
            pool: Arc::new(pool),
        }
    }

    /// Returns the database pool.
    pub fn pool(&self) -> Arc<dyn DatabasePoolInterface> {
        Arc::clone(&self.pool) as Arc<dyn DatabasePoolInterface>
    }

    /// Returns a session factory on the pool.
    pub fn sessions(&self) -> SessionFactory {
        SessionFactory::new(self.pool())
    }
}
