//! Person entity.

use crate::Entity;
use serde::{Deserialize, Serialize};

/// A registered person, persisted in the `person` table.
///
/// Equality and hashing cover every field, identifier included, so two
/// separately loaded copies of the same row compare equal. Distinct and
/// by-example queries depend on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Person {
    /// Store-assigned identifier, `None` until first persisted.
    #[serde(default)]
    pub id: Option<i64>,

    /// Display name.
    pub name: String,

    /// Contact email address.
    pub email: String,

    /// Contact phone number.
    pub phone: String,
}

impl Person {
    /// Creates a new, not yet persisted person.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Returns a copy carrying the given identifier.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Creates an example template with only the email populated.
    #[must_use]
    pub fn example_by_email(email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: String::new(),
            email: email.into(),
            phone: String::new(),
        }
    }
}

impl Entity for Person {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }
}
