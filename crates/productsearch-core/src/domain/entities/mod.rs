//! Domain entities.

mod person;
mod product;
mod seller;

pub use person::Person;
pub use product::Product;
pub use seller::Seller;
