//! Input discovery and per-file artifact naming.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Prefix of the rolling-shutter corrected output.
pub const CORRECTED_PREFIX: &str = "global_";
/// Prefix applied to the corrected name to form the final deliverable.
pub const STABILIZED_PREFIX: &str = "stabilized_";
/// Suffix appended to the base name for the motion-analysis data file.
pub const MOTION_DATA_SUFFIX: &str = "_transform.trf";

/// One discovered source video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    path: PathBuf,
    file_name: String,
    base_name: String,
    extension: String,
}

impl InputFile {
    /// Describe the file at `path`. Returns `None` when the path has no
    /// UTF-8 file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_string();
        let base_name = path.file_stem()?.to_str()?.to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            base_name,
            extension,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including the extension, e.g. `DJI_0001.mp4`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File name without the extension, e.g. `DJI_0001`.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// List the video files directly inside `dir`.
///
/// Only regular files whose extension matches one of `extensions`
/// (case-insensitively) are returned; subdirectories are not descended into.
/// The result is sorted by file name.
///
/// # Errors
///
/// Returns [`sf_core::Error::Config`] if `dir` does not exist or cannot be
/// listed. An existing directory without matches yields an empty list.
pub fn discover_inputs(dir: &Path, extensions: &[String]) -> sf_core::Result<Vec<InputFile>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| sf_core::Error::directory("cannot read input directory", dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| sf_core::Error::directory("cannot read input directory", dir, e))?;
        let path = entry.path();

        // Follows symlinks, so a linked video counts as a regular file.
        if !path.is_file() || !has_video_extension(&path, extensions) {
            continue;
        }

        match InputFile::from_path(&path) {
            Some(input) => inputs.push(input),
            None => tracing::warn!("Skipping {}: file name is not valid UTF-8", path.display()),
        }
    }

    inputs.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!("Discovered {} input file(s) in {}", inputs.len(), dir.display());
    Ok(inputs)
}

fn has_video_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Restrict `inputs` to the file names listed in `only`.
///
/// An empty `only` keeps everything. Names that match no discovered file are
/// reported with a warning.
pub fn select_inputs(inputs: Vec<InputFile>, only: &[String]) -> Vec<InputFile> {
    if only.is_empty() {
        return inputs;
    }

    let wanted: HashSet<&str> = only.iter().map(String::as_str).collect();
    let selected: Vec<InputFile> = inputs
        .into_iter()
        .filter(|input| wanted.contains(input.file_name()))
        .collect();

    for name in only {
        if !selected.iter().any(|input| input.file_name() == name) {
            tracing::warn!("Requested file {name} was not found among the inputs");
        }
    }

    selected
}

/// Artifact locations for one file's pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    /// Rolling-shutter corrected video (`global_<name>`).
    pub corrected: PathBuf,
    /// Final stabilized deliverable (`stabilized_global_<name>`).
    pub stabilized: PathBuf,
    /// Bare motion-analysis file name, resolved against `output_dir`.
    pub motion_data_name: String,
    /// Absolute location of the motion-analysis file.
    pub motion_data: PathBuf,
    pub output_dir: PathBuf,
}

impl PipelineContext {
    pub fn new(input: &InputFile, output_dir: &Path) -> Self {
        Self::with_motion_stem(input, output_dir, input.base_name())
    }

    fn with_motion_stem(input: &InputFile, output_dir: &Path, stem: &str) -> Self {
        let corrected_name = format!("{CORRECTED_PREFIX}{}", input.file_name());
        let stabilized_name = format!("{STABILIZED_PREFIX}{corrected_name}");
        let motion_data_name = format!("{stem}{MOTION_DATA_SUFFIX}");

        Self {
            corrected: output_dir.join(&corrected_name),
            stabilized: output_dir.join(stabilized_name),
            motion_data: output_dir.join(&motion_data_name),
            motion_data_name,
            output_dir: output_dir.to_path_buf(),
        }
    }
}

/// Build the contexts for a whole batch.
///
/// Motion data is named after the base name. Base names that occur more than
/// once (ignoring case, e.g. `clip.mp4` and `clip.MOV`) fall back to the full
/// file name so no two files share a motion data file.
pub fn plan_contexts(inputs: &[InputFile], output_dir: &Path) -> Vec<PipelineContext> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for input in inputs {
        *seen.entry(input.base_name().to_lowercase()).or_default() += 1;
    }

    inputs
        .iter()
        .map(|input| {
            if seen[&input.base_name().to_lowercase()] > 1 {
                PipelineContext::with_motion_stem(input, output_dir, input.file_name())
            } else {
                PipelineContext::new(input, output_dir)
            }
        })
        .collect()
}
