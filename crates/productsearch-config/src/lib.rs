//! # Product Search Config
//!
//! Configuration management for Product Search.
//! Configuration is layered from stage-selected files and environment
//! variables and loaded once at startup.

mod app_config;
mod loader;
mod stage;

pub use app_config::*;
pub use loader::*;
pub use stage::*;
