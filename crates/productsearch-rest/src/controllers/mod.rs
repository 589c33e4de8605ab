//! REST API controllers.

pub mod health_controller;
pub mod product_search_controller;

pub use health_controller::*;
