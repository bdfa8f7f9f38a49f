//! External process invocation and tool discovery.
//!
//! Every program is started from an argument vector. Nothing is routed
//! through a shell, so user text (commit subjects, author names, watermark
//! strings) is never interpreted as shell syntax.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{CinemaError, CinemaResult};

/// A single blocking invocation of an external program.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run the program from `dir` instead of the process working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Short program name used in logs and error messages.
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Build the `std::process::Command` without running it.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run to completion and return trimmed stdout.
    ///
    /// A non-zero exit status becomes [`CinemaError::Tool`] carrying the
    /// program's stderr.
    pub fn run(&self) -> CinemaResult<String> {
        let program = self.program_name();
        tracing::trace!(program = %program, args = ?self.args, "Running external tool");

        let output = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CinemaError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(program = %program, status = %output.status, "External tool failed");
            return Err(CinemaError::Tool {
                program,
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run and report only whether the program exited successfully.
    pub fn succeeds(&self) -> bool {
        self.command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Locate a binary on `PATH` (or accept an explicit path to one).
pub fn find_tool(binary: &str) -> Option<PathBuf> {
    which::which(binary).ok()
}

/// Locate a binary, failing with an environment error that tells the
/// user what to install.
pub fn require_tool(binary: &str, install_hint: &str) -> CinemaResult<PathBuf> {
    find_tool(binary).ok_or_else(|| {
        CinemaError::environment(format!("{binary} not found. {install_hint}"))
    })
}
