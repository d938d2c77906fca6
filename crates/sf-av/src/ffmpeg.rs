//! The two ffmpeg invocation shapes used by the pipeline.
//!
//! - [`transcode`]: input, filter chain, codec selection, output file.
//! - [`analyze`]: input and filter chain with rendered frames discarded
//!   (`-f null -`), run only for the side-effect file a filter writes.
//!
//! Both overwrite existing outputs and never read stdin, so re-running a
//! batch cannot block on an interactive prompt.

use std::path::Path;

use crate::command::ToolCommand;

/// Flags shared by every invocation, placed before the input.
const GLOBAL_ARGS: &[&str] = &["-hide_banner", "-nostdin", "-loglevel", "error", "-y"];

/// Video/audio codec selection for transcoding passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    /// `copy` passes the audio stream through untouched.
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".into(),
            preset: "medium".into(),
            crf: 23,
            audio_codec: "copy".into(),
        }
    }
}

fn with_input(ffmpeg: &Path, input: &Path) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
    cmd.args(GLOBAL_ARGS.iter().copied());
    cmd.arg("-i");
    cmd.arg(input.to_string_lossy());
    cmd
}

/// Build a transcoding invocation writing `output`.
pub fn transcode(
    ffmpeg: &Path,
    input: &Path,
    filter: &str,
    encode: &EncodeSettings,
    output: &Path,
) -> ToolCommand {
    let mut cmd = with_input(ffmpeg, input);
    cmd.args(["-vf", filter]);
    cmd.args(["-c:v", encode.video_codec.as_str()]);
    cmd.args(["-preset", encode.preset.as_str()]);
    cmd.arg("-crf");
    cmd.arg(encode.crf.to_string());
    cmd.args(["-c:a", encode.audio_codec.as_str()]);
    cmd.arg(output.to_string_lossy());
    cmd
}

/// Build an analysis invocation whose rendered output is discarded.
pub fn analyze(ffmpeg: &Path, input: &Path, filter: &str) -> ToolCommand {
    let mut cmd = with_input(ffmpeg, input);
    cmd.args(["-vf", filter]);
    cmd.args(["-f", "null", "-"]);
    cmd
}
