//! ffmpeg filter-graph expressions used by the stabilization passes.
//!
//! Every expression is built from a typed value so the same value always
//! renders to the same bytes. The analysis and transform passes rely on this:
//! vidstab motion data is only valid against the exact padded geometry it was
//! recorded on.

/// Neutral fill color for revealed or padded regions.
pub const NEUTRAL_COLOR: &str = "black";

/// How `deshake` fills the edges revealed by its per-frame warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeshakeEdge {
    /// Fill with zeroes (black).
    Blank = 0,
    /// Keep the original image content.
    Original = 1,
    /// Extend the edge pixels.
    Clamp = 2,
    /// Mirror the content at the edge.
    Mirror = 3,
}

/// `deshake` rolling-shutter correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deshake {
    pub edge: DeshakeEdge,
}

impl Default for Deshake {
    /// Blank (black) edges.
    fn default() -> Self {
        Self {
            edge: DeshakeEdge::Blank,
        }
    }
}

impl Deshake {
    pub fn to_filter(&self) -> String {
        format!("deshake=edge={}", self.edge as u8)
    }
}

/// Center-anchored canvas enlargement.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    /// Factor applied to both width and height.
    pub scale: f64,
    pub color: String,
}

impl Default for Pad {
    fn default() -> Self {
        Self {
            scale: 1.5,
            color: NEUTRAL_COLOR.to_string(),
        }
    }
}

impl Pad {
    pub fn to_filter(&self) -> String {
        format!(
            "pad=w=iw*{scale}:h=ih*{scale}:x=(ow-iw)/2:y=(oh-ih)/2:color={color}",
            scale = self.scale,
            color = self.color
        )
    }
}

/// `vidstabdetect` first pass settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VidstabDetect {
    pub stepsize: u32,
    /// 1 (little shake) ..= 10 (strong shake).
    pub shakiness: u8,
    /// 1 ..= 15.
    pub accuracy: u8,
}

impl Default for VidstabDetect {
    fn default() -> Self {
        Self {
            stepsize: 32,
            shakiness: 10,
            accuracy: 15,
        }
    }
}

impl VidstabDetect {
    /// Render with `result` pointing at the motion data file.
    pub fn to_filter(&self, result: &str) -> String {
        format!(
            "vidstabdetect=stepsize={}:shakiness={}:accuracy={}:result={}",
            self.stepsize,
            self.shakiness,
            self.accuracy,
            escape_option_value(result)
        )
    }
}

/// `vidstabtransform` second pass settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VidstabTransform {
    /// 0 disables auto-zoom, keeping the full padded frame.
    pub optzoom: u8,
    /// Frames on each side used for the smoothing window.
    pub smoothing: u32,
}

impl Default for VidstabTransform {
    fn default() -> Self {
        Self {
            optzoom: 0,
            smoothing: 30,
        }
    }
}

impl VidstabTransform {
    /// Render with `input` pointing at the motion data file.
    pub fn to_filter(&self, input: &str) -> String {
        format!(
            "vidstabtransform=input={}:optzoom={}:smoothing={}",
            escape_option_value(input),
            self.optzoom,
            self.smoothing
        )
    }
}

/// Join filters into a single linear chain.
pub fn chain<I, S>(filters: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    filters
        .into_iter()
        .map(|f| f.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape a value for use as a filter option inside a `-vf` argument.
///
/// Applies both ffmpeg escaping levels: first the option level (`\ ' :`),
/// then the filter-graph level (`\ ' [ ] , ;`). No shell level is needed
/// because arguments never pass through a shell.
pub fn escape_option_value(value: &str) -> String {
    let escape = |s: &str, special: &[char]| {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            if special.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        out
    };

    let option_level = escape(value, &['\\', '\'', ':']);
    escape(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}
