//! Component wiring.
//!
//! Components are assembled by hand into an [`AppModule`]: the pool feeds
//! the person DAO, which feeds the person service. Every component is shared
//! behind an `Arc`.

use productsearch_config::DatabaseConfig;
use productsearch_core::{HealthCheck, ProductSearchError, ProductSearchResult};
use productsearch_repository::{
    create_pool, mappings, DatabasePool, DatabasePoolInterface, PersonDao, PersonDaoImpl,
    SessionFactory,
};
use productsearch_rest::AppState;
use productsearch_service::{PersonService, PersonServiceImpl};
use std::sync::Arc;
use tracing::info;

/// The wired application components.
pub struct AppModule {
    pool: Arc<DatabasePool>,
    person_dao: Arc<dyn PersonDao>,
    person_service: Arc<dyn PersonService>,
}

impl AppModule {
    /// Returns the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        self.pool.clone()
    }

    /// Returns the person DAO.
    pub fn person_dao(&self) -> Arc<dyn PersonDao> {
        self.person_dao.clone()
    }

    /// Returns the person service.
    pub fn person_service(&self) -> Arc<dyn PersonService> {
        self.person_service.clone()
    }

    /// Returns a session factory over the module's pool.
    pub fn session_factory(&self) -> SessionFactory {
        SessionFactory::new(self.dao_pool())
    }

    /// Builds the REST state, with the pool registered as a readiness check.
    pub fn app_state(&self) -> AppState {
        let database: Arc<dyn HealthCheck> = self.pool.clone();
        AppState::new(self.person_service()).with_health_check(database)
    }

    fn dao_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.pool.clone()
    }
}

/// Builder for [`AppModule`].
#[derive(Default)]
pub struct AppModuleBuilder {
    pool: Option<Arc<DatabasePool>>,
}

impl AppModuleBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database pool.
    #[must_use]
    pub fn with_database_pool(mut self, pool: Arc<DatabasePool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Wires the components.
    ///
    /// # Errors
    ///
    /// Fails with `Configuration` when no pool was supplied.
    pub fn build(self) -> ProductSearchResult<AppModule> {
        let pool = self.pool.ok_or_else(|| {
            ProductSearchError::Configuration("database pool is required".to_string())
        })?;

        let dao_pool: Arc<dyn DatabasePoolInterface> = pool.clone();
        let person_dao: Arc<dyn PersonDao> = Arc::new(PersonDaoImpl::new(dao_pool));
        let person_service: Arc<dyn PersonService> =
            Arc::new(PersonServiceImpl::new(person_dao.clone()));

        Ok(AppModule {
            pool,
            person_dao,
            person_service,
        })
    }
}

/// Connects to the database, creates missing tables when configured to, and
/// wires the components.
pub async fn build_app_module(db_config: &DatabaseConfig) -> ProductSearchResult<AppModule> {
    let pool = create_pool(db_config).await?;

    if db_config.auto_create_schema {
        pool.ensure_schema(&mappings::all()).await?;
    } else {
        info!("Schema creation disabled; expecting existing tables");
    }

    AppModuleBuilder::new().with_database_pool(pool).build()
}
