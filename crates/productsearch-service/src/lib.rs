//! # Product Search Service
//!
//! Business logic service layer for Product Search.

pub mod dto;
pub mod r#impl;
pub mod mappers;
pub mod person_service;

pub use dto::*;
pub use person_service::*;
pub use r#impl::PersonServiceImpl;
