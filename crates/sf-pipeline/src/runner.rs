//! The [`StageRunner`] seam: execute one stage invocation and report how it
//! went.
//!
//! A failing stage is an ordinary outcome, not an error, so runners return a
//! [`StageResult`] rather than a `Result`.

use async_trait::async_trait;

use crate::stage::StageInvocation;

/// Outcome of a single external-tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageResult {
    Succeeded,
    Failed {
        /// Command line, exit indication and stderr tail.
        diagnostic: String,
    },
}

impl StageResult {
    pub fn failed(diagnostic: impl Into<String>) -> Self {
        StageResult::Failed {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StageResult::Succeeded)
    }
}

/// Executes stage invocations.
#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Run `invocation` to completion. Must not retry.
    async fn run(&self, invocation: &StageInvocation) -> StageResult;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl StageRunner for ProcessRunner {
    async fn run(&self, invocation: &StageInvocation) -> StageResult {
        let command = &invocation.command;
        match command.execute().await {
            Ok(_) => StageResult::Succeeded,
            Err(e) => {
                let mut diagnostic = format!("{e}; command: {command}");
                if let Some(dir) = command.get_current_dir() {
                    diagnostic.push_str(&format!(" (in {})", dir.display()));
                }
                StageResult::failed(diagnostic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use assert_matches::assert_matches;
    use sf_av::ToolCommand;
    use std::path::PathBuf;

    fn invocation(program: &str, args: &[&str]) -> StageInvocation {
        let mut command = ToolCommand::new(PathBuf::from(program));
        command.args(args.iter().copied());
        StageInvocation {
            stage: Stage::Correction,
            command,
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_succeeds() {
        let result = ProcessRunner.run(&invocation("true", &[])).await;
        assert_eq!(result, StageResult::Succeeded);
        assert!(result.is_success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_fails_with_context() {
        let result = ProcessRunner
            .run(&invocation("sh", &["-c", "echo 'Invalid data found' >&2; exit 1"]))
            .await;
        assert_matches!(result, StageResult::Failed { ref diagnostic } => {
            assert!(diagnostic.contains("Invalid data found"), "got: {diagnostic}");
            assert!(diagnostic.contains("command: sh -c"), "got: {diagnostic}");
        });
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn working_directory_appears_in_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = invocation("false", &[]);
        inv.command.current_dir(dir.path());
        let result = ProcessRunner.run(&inv).await;
        assert_matches!(result, StageResult::Failed { ref diagnostic } => {
            assert!(diagnostic.contains(&dir.path().display().to_string()));
        });
    }

    #[tokio::test]
    async fn launch_failure_is_a_failed_result() {
        let result = ProcessRunner
            .run(&invocation("nonexistent_engine_xyz_987", &["-y"]))
            .await;
        assert_matches!(result, StageResult::Failed { ref diagnostic } => {
            assert!(diagnostic.contains("failed to spawn"), "got: {diagnostic}");
        });
    }
}
