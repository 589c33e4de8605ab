//! Person service implementation.

use crate::dto::{AddUserRequest, PersonResponse};
use crate::person_service::PersonService;
use async_trait::async_trait;
use productsearch_core::{Person, ProductSearchError, ProductSearchResult, Service, ValidateExt};
use productsearch_repository::{PersonDao, SessionContext};
use std::sync::Arc;
use tracing::{debug, info};

/// Person service over a [`PersonDao`].
///
/// Each call runs in a standalone session context, so every write commits on
/// its own.
pub struct PersonServiceImpl {
    person_dao: Arc<dyn PersonDao>,
}

impl PersonServiceImpl {
    /// Creates a new person service.
    #[must_use]
    pub fn new(person_dao: Arc<dyn PersonDao>) -> Self {
        Self { person_dao }
    }
}

impl Service for PersonServiceImpl {}

#[async_trait]
impl PersonService for PersonServiceImpl {
    async fn add_user(&self, request: AddUserRequest) -> ProductSearchResult<PersonResponse> {
        debug!("Adding user: {}", request.email);

        request.validate_request()?;

        let mut cx = SessionContext::standalone();
        let person = self.person_dao.add(&mut cx, &Person::from(request)).await?;

        info!("User added: {:?}", person.id);
        Ok(PersonResponse::from(person))
    }

    async fn get_users_by_email(&self, email: &str) -> ProductSearchResult<Vec<PersonResponse>> {
        debug!("Getting users by email: {}", email);

        if email.trim().is_empty() {
            return Err(ProductSearchError::validation("email: must not be blank"));
        }

        let mut cx = SessionContext::standalone();
        let people = self.person_dao.get_person_by_email(&mut cx, email).await?;
        Ok(people.into_iter().map(PersonResponse::from).collect())
    }
}
