//! External tool detection.
//!
//! The [`ToolRegistry`] discovers and caches the location of the video
//! engine (ffmpeg) and provides lookup methods for the rest of the
//! workspace.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["ffmpeg"];

/// Resolved location of a single external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Human-readable tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool configurations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// If the [`sf_core::ToolsConfig`] supplies a custom path **and** that
    /// path exists, it is used, made absolute against the current directory.
    /// Otherwise [`which::which`] is used to locate the tool in `PATH`. Tools
    /// that are not found are omitted from the registry.
    pub fn discover(tools_config: &sf_core::ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                // Later passes change the working directory, so a relative
                // override must not stay relative.
                Some(p) if p.exists() => {
                    Some(std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf()))
                }
                Some(p) => {
                    tracing::warn!(
                        "configured {name} path {} does not exist; searching PATH",
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            if let Some(path) = resolved {
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Return a reference to the [`ToolConfig`] for the given tool, or an
    /// [`sf_core::Error::Tool`] if the tool was not found during discovery.
    pub fn require(&self, name: &str) -> sf_core::Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            sf_core::Error::tool(
                name,
                format!("{name} not found; install it or set FFMPEG_PATH"),
            )
        })
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(&cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
