//! Person-specific data access.

use crate::criteria::{Criteria, Restriction};
use crate::dao::{GenericDao, SqlxGenericDao};
use crate::session::SessionContext;
use async_trait::async_trait;
use productsearch_core::{Person, ProductSearchResult};
use tracing::debug;

/// Person data access on top of [`GenericDao`].
#[async_trait]
pub trait PersonDao: GenericDao<Person> {
    /// Finds people with exactly this email, one entry per identifier.
    async fn get_person_by_email(
        &self,
        cx: &mut SessionContext,
        email: &str,
    ) -> ProductSearchResult<Vec<Person>>;

    /// Persists a person, returning it with its assigned id.
    async fn add(&self, cx: &mut SessionContext, person: &Person) -> ProductSearchResult<Person>;
}

#[async_trait]
impl PersonDao for SqlxGenericDao<Person> {
    async fn get_person_by_email(
        &self,
        cx: &mut SessionContext,
        email: &str,
    ) -> ProductSearchResult<Vec<Person>> {
        debug!("Finding person by email: {}", email);
        let criteria = Criteria::new()
            .add(Restriction::eq("email", email))
            .distinct_by_id();
        self.find_by_criteria(cx, &criteria, None, None).await
    }

    async fn add(&self, cx: &mut SessionContext, person: &Person) -> ProductSearchResult<Person> {
        self.save(cx, person).await
    }
}
