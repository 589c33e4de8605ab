//! # Product Search Repository
//!
//! Generic data access over SQLx:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn PersonDao>        (DAO interface, extends GenericDao<Person>)
//! SqlxGenericDao<Person>         (generic SQLx implementation)
//!   ↓  SessionContext / Session  (transaction scope)
//! AnyPool (MySQL or SQLite)
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   mapping.rs        ← EntityMapping, Persistent, PrimaryKey
//!   value.rs          ← Value and parameter binding
//!   criteria.rs       ← Criteria, Restriction, Order
//!   sql.rs            ← statement builders, named queries
//!   schema.rs         ← Dialect, CREATE TABLE generation
//!   pool.rs           ← DatabasePool
//!   session.rs        ← SessionFactory, Session, SessionContext
//!   mappings/         ← mappings of the domain entities
//!   dao/
//!     generic_dao.rs  ← GenericDao trait
//!     person_dao.rs   ← PersonDao trait + impl
//!     impl/
//!       sqlx_generic_dao.rs ← SqlxGenericDao
//! ```

pub mod criteria;
pub mod dao;
pub mod mapping;
pub mod mappings;
pub mod pool;
pub mod schema;
pub mod session;
pub mod sql;
pub mod value;

pub use criteria::{Criteria, Order, Restriction};
pub use dao::{GenericDao, PersonDao, PersonDaoImpl, SqlxGenericDao};
pub use mapping::*;
pub use pool::*;
pub use schema::Dialect;
pub use session::{Session, SessionContext, SessionFactory};
pub use sql::Statement;
pub use value::Value;
