//! Seller entity.

use crate::ContactDetails;
use serde::{Deserialize, Serialize};

/// A seller; every field is optional and takes part in equality and hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seller {
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default)]
    pub contact_details: Option<ContactDetails>,
}

impl Seller {
    /// Creates a seller with an id and a name.
    #[must_use]
    pub fn named(seller_id: impl Into<String>, seller_name: impl Into<String>) -> Self {
        Self {
            seller_id: Some(seller_id.into()),
            seller_name: Some(seller_name.into()),
            contact_details: None,
        }
    }

    /// Attaches contact details.
    #[must_use]
    pub fn with_contact_details(mut self, contact_details: ContactDetails) -> Self {
        self.contact_details = Some(contact_details);
        self
    }
}
