//! Mappings of the persisted domain entities.

mod person_mapping;

pub use person_mapping::PERSON_MAPPING;

use crate::EntityMapping;

/// Every mapping whose table the service needs at startup.
#[must_use]
pub fn all() -> Vec<&'static EntityMapping> {
    vec![&PERSON_MAPPING]
}
