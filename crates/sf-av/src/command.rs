//! Builder for executing external tool commands as child processes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

/// How many trailing stderr lines are kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// Arguments are passed to the child as a discrete list; no shell is ever
/// involved, so file names with spaces or quotes need no escaping.
///
/// # Example
///
/// ```no_run
/// use sf_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> sf_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-hide_banner")
///     .arg("-version")
///     .current_dir("/tmp")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Run the child with `dir` as its working directory instead of the
    /// caller's.
    pub fn current_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The executable this command runs.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// The ordered argument list.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The working directory override, if any.
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - Returns [`sf_core::Error::Tool`] if the process exits with a non-zero
    ///   status (message includes the tail of stderr).
    /// - Returns [`sf_core::Error::Tool`] if spawning the process fails.
    pub async fn execute(&self) -> sf_core::Result<ToolOutput> {
        let program_name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(std::process::Stdio::null());
        cmd.stdout(std::process::Stdio::piped());
        cmd.stderr(std::process::Stdio::piped());

        tracing::debug!("exec: {self}");

        let child = cmd
            .spawn()
            .map_err(|e| sf_core::Error::tool(&program_name, format!("failed to spawn: {e}")))?;

        let output = child.wait_with_output().await.map_err(|e| {
            sf_core::Error::tool(&program_name, format!("I/O error waiting for process: {e}"))
        })?;

        let tool_output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            let tail = stderr_tail(&tool_output.stderr, STDERR_TAIL_LINES);
            let message = if tail.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {tail}", output.status)
            };
            return Err(sf_core::Error::tool(program_name, message));
        }

        Ok(tool_output)
    }
}

/// Renders the command line for logs and diagnostics, quoting arguments that
/// contain whitespace or quotes.
impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        s.to_string()
    } else {
        format!("{s:?}")
    }
}

/// Keep the last `lines` non-empty lines of `stderr`, joined with " | ".
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join(" | ")
}
