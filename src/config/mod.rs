//! Configuration module for resilient fetching
//!
//! This module provides the `FetchConfig` struct and its validating builder
//! with sensible defaults for every strategy level.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::FetchConfigBuilder;
pub use types::{ConfigError, FetchConfig};
