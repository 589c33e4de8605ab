//! Domain entities and value objects of the product search catalogue.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
