//! The three stage invocations of the stabilization pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sf_av::filters::{self, Deshake, Pad, VidstabDetect, VidstabTransform};
use sf_av::{ffmpeg, EncodeSettings, ToolCommand};

use crate::paths::PipelineContext;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage 1: rolling-shutter correction (deshake).
    Correction,
    /// Stage 2a: vidstab motion analysis.
    Analysis,
    /// Stage 2b: vidstab transform.
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Correction => "Pass 1 (rolling-shutter correction)",
            Stage::Analysis => "Pass 2a (motion analysis)",
            Stage::Transform => "Pass 2b (transform)",
        };
        f.write_str(label)
    }
}

/// One stage's external-tool call, built just before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInvocation {
    pub stage: Stage,
    pub command: ToolCommand,
}

/// Fixed filter and encoder parameters shared by every file in a batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StabilizeSettings {
    pub deshake: Deshake,
    pub pad: Pad,
    pub detect: VidstabDetect,
    pub transform: VidstabTransform,
    pub encode: EncodeSettings,
}

/// Builds stage invocations for one ffmpeg binary.
#[derive(Debug, Clone)]
pub struct StagePlanner {
    ffmpeg: PathBuf,
    settings: StabilizeSettings,
}

impl StagePlanner {
    pub fn new(ffmpeg: PathBuf, settings: StabilizeSettings) -> Self {
        Self { ffmpeg, settings }
    }

    /// Deshake the raw input into the corrected output.
    pub fn correction(&self, input: &Path, ctx: &PipelineContext) -> StageInvocation {
        let command = ffmpeg::transcode(
            &self.ffmpeg,
            input,
            &self.settings.deshake.to_filter(),
            &self.settings.encode,
            &ctx.corrected,
        );
        StageInvocation {
            stage: Stage::Correction,
            command,
        }
    }

    /// Pad the corrected output and record motion data next to it.
    ///
    /// Runs inside the output directory so the filter graph names the motion
    /// data file by its bare name.
    pub fn analysis(&self, ctx: &PipelineContext) -> StageInvocation {
        let filter = filters::chain([
            self.settings.pad.to_filter(),
            self.settings.detect.to_filter(&ctx.motion_data_name),
        ]);
        let mut command = ffmpeg::analyze(&self.ffmpeg, &ctx.corrected, &filter);
        command.current_dir(&ctx.output_dir);
        StageInvocation {
            stage: Stage::Analysis,
            command,
        }
    }

    /// Re-apply the identical pad and the recorded transforms.
    pub fn transform(&self, ctx: &PipelineContext) -> StageInvocation {
        let filter = filters::chain([
            self.settings.pad.to_filter(),
            self.settings.transform.to_filter(&ctx.motion_data_name),
        ]);
        let mut command = ffmpeg::transcode(
            &self.ffmpeg,
            &ctx.corrected,
            &filter,
            &self.settings.encode,
            &ctx.stabilized,
        );
        command.current_dir(&ctx.output_dir);
        StageInvocation {
            stage: Stage::Transform,
            command,
        }
    }
}
