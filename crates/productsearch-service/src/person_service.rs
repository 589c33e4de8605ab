//! Person service trait definition.

use crate::dto::{AddUserRequest, PersonResponse};
use async_trait::async_trait;
use productsearch_core::{ProductSearchResult, Service};

/// Person service trait.
#[async_trait]
pub trait PersonService: Service {
    /// Validates and persists a new person.
    async fn add_user(&self, request: AddUserRequest) -> ProductSearchResult<PersonResponse>;

    /// Lists the people registered with an email address.
    async fn get_users_by_email(&self, email: &str) -> ProductSearchResult<Vec<PersonResponse>>;
}
