//! Value objects.

mod contact_details;

pub use contact_details::ContactDetails;
