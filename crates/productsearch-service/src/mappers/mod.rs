//! Entity-DTO mappers.

use crate::dto::{AddUserRequest, PersonResponse};
use productsearch_core::Person;

impl From<AddUserRequest> for Person {
    fn from(request: AddUserRequest) -> Self {
        Person::new(request.name, request.email, request.phone)
    }
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            email: person.email,
            phone: person.phone,
        }
    }
}
