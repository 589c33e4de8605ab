//! Database connection pool management.

use crate::schema::{create_table_sql, Dialect};
use crate::EntityMapping;
use async_trait::async_trait;
use productsearch_config::DatabaseConfig;
use productsearch_core::{HealthCheck, HealthStatus, ProductSearchError, ProductSearchResult};
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Interface for database pool operations.
#[async_trait]
pub trait DatabasePoolInterface: Send + Sync {
    /// Returns a reference to the underlying pool.
    fn inner(&self) -> &AnyPool;

    /// Returns the dialect of the connected database.
    fn dialect(&self) -> Dialect;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> ProductSearchResult<()>;

    /// Creates the tables of the given mappings when missing.
    async fn ensure_schema(&self, mappings: &[&'static EntityMapping]) -> ProductSearchResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
pub struct DatabasePool {
    pool: AnyPool,
    dialect: Dialect,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported URL or when no connection can be established.
    pub async fn new(config: &DatabaseConfig) -> ProductSearchResult<Self> {
        sqlx::any::install_default_drivers();

        let dialect = Dialect::from_url(&config.url)?;
        info!("Connecting to {} database...", dialect);

        let mut options = AnyConnectOptions::from_str(&config.url)
            .map_err(|e| ProductSearchError::Configuration(format!("Invalid database URL: {e}")))?;
        if !config.log_queries {
            options = options.disable_statement_logging();
        }

        let pool = AnyPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect_with(options)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                ProductSearchError::Database(format!("Failed to connect: {e}"))
            })?;

        info!("{} connection pool established", dialect);
        Ok(Self { pool, dialect })
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &AnyPool {
        &self.pool
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn health_check(&self) -> ProductSearchResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ProductSearchError::Database(format!("Health check failed: {e}")))?;
        Ok(())
    }

    async fn ensure_schema(&self, mappings: &[&'static EntityMapping]) -> ProductSearchResult<()> {
        for mapping in mappings {
            let ddl = create_table_sql(mapping, self.dialect);
            sqlx::query(&ddl).execute(&self.pool).await.map_err(|e| {
                ProductSearchError::Database(format!(
                    "Failed to create table {}: {e}",
                    mapping.table
                ))
            })?;
            info!("Ensured table {} for {}", mapping.table, mapping.entity);
        }
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match DatabasePoolInterface::health_check(self).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("dialect", &self.dialect)
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared database pool.
///
/// # Errors
///
/// See [`DatabasePool::new`].
pub async fn create_pool(config: &DatabaseConfig) -> ProductSearchResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    Ok(Arc::new(pool))
}
