use clap::Parser;
use sf_core::Config;
use std::path::PathBuf;

/// Every option is optional: with none given, directories come from
/// INPUT_DIR / OUTPUT_DIR (or a .env file) and fall back to ./input and
/// ./output.
#[derive(Parser, Debug)]
#[command(name = "steadyforge")]
#[command(
    author,
    version,
    about = "Batch rolling-shutter correction and stabilization of video files"
)]
pub struct Cli {
    /// Directory containing the source videos [env: INPUT_DIR]
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory receiving the corrected and stabilized videos [env: OUTPUT_DIR]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// ffmpeg executable to use instead of the one on PATH [env: FFMPEG_PATH]
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Video file extension to pick up (repeatable, default: mp4)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Number of files processed at the same time
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Only process the named input file (repeatable)
    #[arg(long, value_name = "FILE")]
    pub only: Vec<String>,

    /// Write a JSON report of per-file outcomes
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of `base`.
    pub fn apply(&self, mut base: Config) -> Config {
        if let Some(ref dir) = self.input {
            base.input_dir = dir.clone();
        }
        if let Some(ref dir) = self.output {
            base.output_dir = dir.clone();
        }
        if let Some(ref path) = self.ffmpeg {
            base.tools.ffmpeg_path = Some(path.clone());
        }
        if !self.extensions.is_empty() {
            base.extensions = self
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if let Some(jobs) = self.jobs {
            base.jobs = jobs;
        }
        base
    }
}
