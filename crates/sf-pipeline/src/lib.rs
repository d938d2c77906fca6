//! # sf-pipeline
//!
//! Orchestration of the two-pass stabilization pipeline.
//!
//! This crate provides:
//!
//! - **[`paths`]** -- input discovery and deterministic artifact naming.
//! - **[`StageRunner`]** trait -- runs one stage invocation and reports a
//!   [`StageResult`]; [`ProcessRunner`] is the child-process implementation.
//! - **[`StagePlanner`]** -- builds the correction, analysis and transform
//!   invocations for a file.
//! - **[`PipelineExecutor`]** -- sequences the stages for one file and stops
//!   at the first failure, always cleaning up the motion data file.
//! - **[`BatchCoordinator`]** -- runs the executor over a whole directory and
//!   collects a [`BatchReport`].

pub mod artifact;
pub mod batch;
pub mod executor;
pub mod paths;
pub mod report;
pub mod runner;
pub mod stage;

// Re-export key types at the crate root.
pub use artifact::TransientArtifact;
pub use batch::BatchCoordinator;
pub use executor::PipelineExecutor;
pub use paths::{InputFile, PipelineContext};
pub use report::{BatchReport, FileOutcome, FileStatus};
pub use runner::{ProcessRunner, StageResult, StageRunner};
pub use stage::{StabilizeSettings, Stage, StageInvocation, StagePlanner};
