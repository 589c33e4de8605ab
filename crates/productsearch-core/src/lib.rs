//! # Product Search Core
//!
//! Core types, traits, domain entities and error definitions shared by every
//! layer of the Product Search service.

pub mod domain;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
