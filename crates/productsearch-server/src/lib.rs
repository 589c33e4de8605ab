//! # Product Search Server Library
//!
//! Component wiring and startup utilities for the Product Search server.

pub mod di;
pub mod startup;
