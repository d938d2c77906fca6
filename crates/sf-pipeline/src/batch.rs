//! Batch coordinator: prepares the output directory, discovers inputs and
//! runs the pipeline for each of them, collecting every outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use sf_av::ToolRegistry;
use sf_core::Config;

use crate::executor::PipelineExecutor;
use crate::paths::{discover_inputs, plan_contexts, select_inputs};
use crate::report::BatchReport;
use crate::runner::StageRunner;
use crate::stage::{StabilizeSettings, StagePlanner};

/// Runs the pipeline over every eligible file in the input directory.
///
/// A failing file never stops the batch; only configuration problems (no
/// usable output directory, unreadable input directory, no ffmpeg) abort it,
/// and they do so before the first stage runs.
pub struct BatchCoordinator {
    config: Config,
    tools: ToolRegistry,
    runner: Arc<dyn StageRunner>,
    settings: StabilizeSettings,
    only: Vec<String>,
}

impl BatchCoordinator {
    pub fn new(config: Config, tools: ToolRegistry, runner: Arc<dyn StageRunner>) -> Self {
        Self {
            config,
            tools,
            runner,
            settings: StabilizeSettings::default(),
            only: Vec::new(),
        }
    }

    /// Override the filter and encoder parameters.
    pub fn with_settings(mut self, settings: StabilizeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Process only the named files (e.g. the failures of a previous run).
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Run the batch.
    ///
    /// # Errors
    ///
    /// - [`sf_core::Error::Config`] if the output directory cannot be created
    ///   or the input directory cannot be read.
    /// - [`sf_core::Error::Tool`] if ffmpeg cannot be found and there is at
    ///   least one file to process.
    pub async fn run(&self) -> sf_core::Result<BatchReport> {
        let started_at = Utc::now();
        let output_dir = prepare_output_dir(&self.config.output_dir)?;

        let inputs = discover_inputs(&self.config.input_dir, &self.config.extensions)?;
        let inputs = select_inputs(inputs, &self.only);
        if inputs.is_empty() {
            tracing::info!(
                "No matching files found in {}",
                self.config.input_dir.display()
            );
            return Ok(BatchReport::empty(
                self.config.input_dir.clone(),
                output_dir,
                started_at,
            ));
        }
        tracing::info!("Found {} files.", inputs.len());

        let ffmpeg = self.tools.require("ffmpeg")?.path.clone();
        let executor = PipelineExecutor::new(
            self.runner.clone(),
            StagePlanner::new(ffmpeg, self.settings.clone()),
        );

        let contexts = plan_contexts(&inputs, &output_dir);
        let outcomes = stream::iter(inputs.iter().zip(&contexts))
            .map(|(input, ctx)| executor.run(input, ctx))
            .buffered(self.config.effective_jobs())
            .collect::<Vec<_>>()
            .await;

        let report = BatchReport {
            input_dir: self.config.input_dir.clone(),
            output_dir,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            report.succeeded().count(),
            report.failed().count()
        );
        Ok(report)
    }
}

/// Create the output directory if needed, check that it accepts new files
/// and return its absolute path.
///
/// Later stages run with the output directory as their working directory, so
/// every path handed to them must be absolute.
fn prepare_output_dir(dir: &Path) -> sf_core::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| sf_core::Error::directory("cannot create output directory", dir, e))?;
    // Dropping the probe file removes it again.
    tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| sf_core::Error::directory("output directory is not writable", dir, e))?;
    std::path::absolute(dir)
        .map_err(|e| sf_core::Error::directory("cannot resolve output directory", dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::FakeEngine;
    use crate::report::FileStatus;
    use crate::stage::Stage;
    use assert_matches::assert_matches;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        _ffmpeg: tempfile::NamedTempFile,
        config: Config,
        tools: ToolRegistry,
    }

    impl Fixture {
        fn new(files: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let input_dir = dir.path().join("in");
            fs::create_dir(&input_dir).unwrap();
            for name in files {
                fs::write(input_dir.join(name), b"raw").unwrap();
            }

            // Only needs to exist; the fake engine never executes it.
            let ffmpeg = tempfile::NamedTempFile::new().unwrap();
            let mut config = Config {
                input_dir,
                output_dir: dir.path().join("out"),
                ..Config::default()
            };
            config.tools.ffmpeg_path = Some(ffmpeg.path().to_path_buf());
            let tools = ToolRegistry::discover(&config.tools);

            Self {
                _dir: dir,
                _ffmpeg: ffmpeg,
                config,
                tools,
            }
        }

        fn out(&self, name: &str) -> PathBuf {
            self.config.output_dir.join(name)
        }

        fn coordinator(&self, engine: Arc<FakeEngine>) -> BatchCoordinator {
            BatchCoordinator::new(self.config.clone(), self.tools.clone(), engine)
        }
    }

    #[tokio::test]
    async fn mixed_batch_processes_every_file() {
        let fx = Fixture::new(&["bad.mp4", "good.mp4"]);
        let engine = Arc::new(FakeEngine {
            broken_inputs: vec!["bad.mp4".into()],
            ..FakeEngine::default()
        });

        let report = fx.coordinator(engine.clone()).run().await.unwrap();

        assert_eq!(report.processed(), 2);
        assert_matches!(
            report.outcomes[0].status,
            FileStatus::Failed { stage: Stage::Correction, .. }
        );
        assert_eq!(report.outcomes[1].status, FileStatus::Completed);

        assert!(fx.out("stabilized_global_good.mp4").exists());
        assert!(!fx.out("stabilized_global_bad.mp4").exists());
        assert!(!fx.out("bad_transform.trf").exists());
        assert!(!fx.out("good_transform.trf").exists());

        // bad: correction only; good: all three.
        assert_eq!(engine.stages_run().len(), 4);
    }

    #[tokio::test]
    async fn empty_input_directory_is_not_an_error() {
        let fx = Fixture::new(&[]);
        let engine = Arc::new(FakeEngine::default());

        let report = fx.coordinator(engine.clone()).run().await.unwrap();

        assert!(report.is_empty());
        assert!(engine.stages_run().is_empty());
        assert!(fx.config.output_dir.is_dir());
    }

    #[tokio::test]
    async fn uncreatable_output_directory_aborts_before_any_stage() {
        let mut fx = Fixture::new(&["clip.mp4"]);
        let blocker = fx.config.input_dir.join("not-a-dir.txt");
        fs::write(&blocker, b"").unwrap();
        fx.config.output_dir = blocker.join("out");
        let engine = Arc::new(FakeEngine::default());

        let err = fx.coordinator(engine.clone()).run().await.unwrap_err();

        assert_matches!(err, sf_core::Error::Config(ref msg) => {
            assert!(msg.contains("cannot create output directory"), "got: {msg}");
        });
        assert!(engine.stages_run().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_output_directory_aborts_before_any_stage() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new(&["clip.mp4"]);
        fs::create_dir(&fx.config.output_dir).unwrap();
        fs::set_permissions(&fx.config.output_dir, fs::Permissions::from_mode(0o555)).unwrap();
        // Permission bits do not bind root; skip when the directory stays writable.
        if fs::write(fx.out("writable-check"), b"").is_ok() {
            return;
        }
        let engine = Arc::new(FakeEngine::default());

        let result = fx.coordinator(engine.clone()).run().await;
        fs::set_permissions(&fx.config.output_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert_matches!(result, Err(sf_core::Error::Config(ref msg)) => {
            assert!(msg.contains("output directory is not writable"), "got: {msg}");
        });
        assert!(engine.stages_run().is_empty());
    }

    #[tokio::test]
    async fn settings_override_reaches_every_invocation() {
        let fx = Fixture::new(&["clip.mp4"]);
        let engine = Arc::new(FakeEngine::default());
        let mut settings = StabilizeSettings::default();
        settings.pad.scale = 2.0;

        let report = fx
            .coordinator(engine.clone())
            .with_settings(settings)
            .run()
            .await
            .unwrap();

        assert_eq!(report.succeeded().count(), 1);
        let calls = engine.calls.lock();
        let padded: Vec<Stage> = calls
            .iter()
            .filter(|c| c.command.get_args().iter().any(|a| a.starts_with("pad=w=iw*2:")))
            .map(|c| c.stage)
            .collect();
        assert_eq!(padded, vec![Stage::Analysis, Stage::Transform]);
    }

    #[tokio::test]
    async fn missing_input_directory_is_config_error() {
        let mut fx = Fixture::new(&[]);
        fx.config.input_dir = fx.config.input_dir.join("missing");
        let err = fx
            .coordinator(Arc::new(FakeEngine::default()))
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn missing_ffmpeg_is_fatal_only_with_work_to_do() {
        let mut fx = Fixture::new(&["clip.mp4"]);
        fx.tools = ToolRegistry::discover(&sf_core::ToolsConfig {
            ffmpeg_path: Some(PathBuf::from("/nonexistent/ffmpeg-xyz")),
        });
        // The registry falls back to PATH; skip when a real ffmpeg is there.
        if fx.tools.require("ffmpeg").is_ok() {
            return;
        }
        let engine = Arc::new(FakeEngine::default());

        let err = fx.coordinator(engine.clone()).run().await.unwrap_err();

        assert_matches!(err, sf_core::Error::Tool { .. });
        assert!(engine.stages_run().is_empty());
    }

    #[tokio::test]
    async fn rerun_overwrites_outputs() {
        let fx = Fixture::new(&["clip.mp4"]);

        let first = fx.coordinator(Arc::new(FakeEngine::default())).run().await.unwrap();
        assert_eq!(first.succeeded().count(), 1);
        fs::write(fx.out("stabilized_global_clip.mp4"), b"stale").unwrap();

        let second = fx.coordinator(Arc::new(FakeEngine::default())).run().await.unwrap();
        assert_eq!(second.succeeded().count(), 1);
        assert_eq!(
            fs::read_to_string(fx.out("stabilized_global_clip.mp4")).unwrap(),
            Stage::Transform.to_string()
        );
    }

    #[tokio::test]
    async fn only_filter_limits_the_batch() {
        let fx = Fixture::new(&["a.mp4", "b.mp4", "c.mp4"]);
        let engine = Arc::new(FakeEngine::default());

        let report = fx
            .coordinator(engine.clone())
            .with_only(vec!["b.mp4".into()])
            .run()
            .await
            .unwrap();

        assert_eq!(report.processed(), 1);
        assert_eq!(report.outcomes[0].file, "b.mp4");
        assert_eq!(engine.stages_run().len(), 3);
    }

    #[tokio::test]
    async fn concurrent_jobs_keep_discovery_order() {
        let mut fx = Fixture::new(&["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);
        fx.config.jobs = 3;
        let engine = Arc::new(FakeEngine {
            broken_inputs: vec!["c.mp4".into()],
            ..FakeEngine::default()
        });

        let report = fx.coordinator(engine).run().await.unwrap();

        let files: Vec<&str> = report.outcomes.iter().map(|o| o.file.as_str()).collect();
        assert_eq!(files, vec!["a.mp4", "b.mp4", "c.mp4", "d.mp4"]);
        assert_eq!(report.failed().count(), 1);
        for name in ["a", "b", "c", "d"] {
            assert!(!fx.out(&format!("{name}_transform.trf")).exists());
        }
    }
}
