//! sf-core: shared error type and configuration.
//!
//! This crate is the foundational dependency for the other sf-* crates,
//! providing the unified error type and the batch configuration that is
//! resolved once at startup and passed down explicitly.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use config::{Config, ToolsConfig};
pub use error::{Error, Result};
