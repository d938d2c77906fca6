//! # sf-av
//!
//! External video engine plumbing for the steadyforge pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the path to
//!   ffmpeg, honouring an explicit override.
//! - **Command execution** ([`ToolCommand`]) -- async builder running an
//!   external process with a discrete argument list and an optional working
//!   directory.
//! - **Invocation shapes** ([`ffmpeg`]) -- transcoding and null-output
//!   analysis commands.
//! - **Filter expressions** ([`filters`]) -- deshake, pad, vidstab and
//!   filter-graph escaping.

pub mod command;
pub mod ffmpeg;
pub mod filters;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use ffmpeg::EncodeSettings;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
