//! Batch configuration.
//!
//! A [`Config`] is resolved exactly once at startup (environment first, then
//! command-line overrides) and handed to the batch coordinator. Nothing below
//! the binary reads the environment.

use std::path::PathBuf;

/// Environment variable naming the input directory.
pub const INPUT_DIR_VAR: &str = "INPUT_DIR";
/// Environment variable naming the output directory.
pub const OUTPUT_DIR_VAR: &str = "OUTPUT_DIR";
/// Environment variable overriding the ffmpeg executable.
pub const FFMPEG_PATH_VAR: &str = "FFMPEG_PATH";

const DEFAULT_INPUT_DIR: &str = "input";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_EXTENSION: &str = "mp4";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root batch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory scanned (non-recursively) for input videos.
    pub input_dir: PathBuf,
    /// Directory receiving corrected and stabilized outputs.
    pub output_dir: PathBuf,
    /// File extensions considered videos, without the dot. Matched
    /// case-insensitively.
    pub extensions: Vec<String>,
    /// Maximum number of files processed at once.
    pub jobs: usize,
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            jobs: 1,
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        match var(INPUT_DIR_VAR) {
            Some(dir) => config.input_dir = PathBuf::from(dir),
            None => tracing::debug!(
                "{INPUT_DIR_VAR} not set; using {}",
                config.input_dir.display()
            ),
        }
        match var(OUTPUT_DIR_VAR) {
            Some(dir) => config.output_dir = PathBuf::from(dir),
            None => tracing::debug!(
                "{OUTPUT_DIR_VAR} not set; using {}",
                config.output_dir.display()
            ),
        }
        config.tools.ffmpeg_path = var(FFMPEG_PATH_VAR).map(PathBuf::from);

        config
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.jobs == 0 {
            warnings.push("jobs is 0; files will be processed one at a time".into());
        }

        if self.extensions.is_empty() {
            warnings.push("no video extensions configured; nothing will be discovered".into());
        }

        if self.input_dir == self.output_dir {
            warnings.push(format!(
                "input and output directory are both {}; outputs will be picked up as inputs on the next run",
                self.input_dir.display()
            ));
        }

        warnings
    }

    /// Effective concurrency, never below one.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.max(1)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Paths to external tool binaries. When unset, tools are looked up in `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
}
