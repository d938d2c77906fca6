//! Pipeline executor: runs the correction, analysis and transform stages for
//! one file, stopping at the first failure.
//!
//! The motion data file is held by a [`TransientArtifact`] for the whole run,
//! so it is gone by the time the outcome is returned whichever way the run
//! ended.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::artifact::{discard, TransientArtifact};
use crate::paths::{InputFile, PipelineContext};
use crate::report::{FileOutcome, FileStatus};
use crate::runner::{StageResult, StageRunner};
use crate::stage::{Stage, StageInvocation, StagePlanner};

/// Why a file's pipeline stopped early.
#[derive(Debug)]
struct StageFailure {
    stage: Stage,
    diagnostic: String,
}

/// Runs the stabilization pipeline for individual files.
pub struct PipelineExecutor {
    runner: Arc<dyn StageRunner>,
    planner: StagePlanner,
}

impl PipelineExecutor {
    pub fn new(runner: Arc<dyn StageRunner>, planner: StagePlanner) -> Self {
        Self { runner, planner }
    }

    /// Run every stage for `input`. Never fails: a stage failure is recorded
    /// in the returned outcome.
    pub async fn run(&self, input: &InputFile, ctx: &PipelineContext) -> FileOutcome {
        let started = Instant::now();
        tracing::info!("Processing: {}", input.path().display());

        let result = {
            let _motion_data = TransientArtifact::acquire(&ctx.motion_data);
            self.run_stages(input, ctx).await
        };

        let (status, output) = match result {
            Ok(()) => {
                tracing::info!("[Done] Finished {}", input.file_name());
                (FileStatus::Completed, Some(ctx.stabilized.clone()))
            }
            Err(StageFailure { stage, diagnostic }) => {
                tracing::error!(
                    "[Error] {stage} failed for {}: {diagnostic}",
                    input.file_name()
                );
                (FileStatus::Failed { stage, diagnostic }, None)
            }
        };

        FileOutcome {
            file: input.file_name().to_string(),
            input: input.path().to_path_buf(),
            status,
            output,
            elapsed_secs: started.elapsed().as_secs_f64(),
        }
    }

    async fn run_stages(&self, input: &InputFile, ctx: &PipelineContext) -> Result<(), StageFailure> {
        let result = self.run_all(input, ctx).await;
        if result.is_err() {
            // A failed file never keeps a deliverable, partial or stale.
            discard(&ctx.stabilized);
        }
        result
    }

    async fn run_all(&self, input: &InputFile, ctx: &PipelineContext) -> Result<(), StageFailure> {
        self.run_stage(self.planner.correction(input.path(), ctx), &ctx.corrected)
            .await?;
        self.run_stage(self.planner.analysis(ctx), &ctx.motion_data)
            .await?;
        self.run_stage(self.planner.transform(ctx), &ctx.stabilized)
            .await
    }

    /// Run one stage and require that it produced `declared_output`.
    ///
    /// Any earlier copy of `declared_output` is removed first, so only a file
    /// written by this invocation satisfies the check.
    async fn run_stage(
        &self,
        invocation: StageInvocation,
        declared_output: &Path,
    ) -> Result<(), StageFailure> {
        let stage = invocation.stage;
        tracing::info!("  [{stage}] -> {}", declared_output.display());
        tracing::debug!("  [{stage}] {}", invocation.command);
        discard(declared_output);

        match self.runner.run(&invocation).await {
            StageResult::Succeeded if declared_output.exists() => Ok(()),
            StageResult::Succeeded => Err(StageFailure {
                stage,
                diagnostic: format!(
                    "engine reported success but {} was not written",
                    declared_output.display()
                ),
            }),
            StageResult::Failed { diagnostic } => Err(StageFailure { stage, diagnostic }),
        }
    }
}
