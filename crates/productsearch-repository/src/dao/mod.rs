//! DAO (Data Access Object) layer.
//!
//! [`GenericDao`] is the entity-agnostic contract; [`PersonDao`] extends it
//! with person-specific lookups. Both are implemented over SQLx by
//! [`SqlxGenericDao`].
//!
//! ```text
//! Service → PersonDao (GenericDao<Person>) → SqlxGenericDao<Person> → Session → DB
//! ```

pub mod generic_dao;
pub mod r#impl;
pub mod person_dao;

pub use generic_dao::GenericDao;
pub use person_dao::PersonDao;
pub use r#impl::{PersonDaoImpl, SqlxGenericDao};
