//! SQLx-backed DAO implementations.

mod sqlx_generic_dao;

pub use sqlx_generic_dao::{Operation, SqlxGenericDao};

/// Person DAO over SQLx.
pub type PersonDaoImpl = SqlxGenericDao<productsearch_core::Person>;
