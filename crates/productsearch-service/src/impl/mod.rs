//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `person_service.rs`).

pub mod person_service_impl;

pub use person_service_impl::PersonServiceImpl;
