//! External command execution utilities.
//!
//! Provides a Builder-based API for running external commands with proper
//! output handling and stdin piping.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Simple command
//! Cmd::new("magick").args(["input.jpg", "-resize", "800x800>", "out.jpg"]).run()?;
//!
//! // With stdin piping
//! let output = Cmd::new("magick")
//!     .args(["-", "jpg:-"])
//!     .stdin(bytes)
//!     .run()?;
//! ```

use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

// ============================================================================
// Tool discovery
// ============================================================================

/// Locate an external tool on PATH.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
///
/// Provides a fluent API for configuring and running external commands.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    stdin_data: Option<Vec<u8>>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set stdin data to pipe to the process.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    /// Execute the command and return its output.
    ///
    /// A non-zero exit status is an error carrying the command line and
    /// captured stderr.
    pub fn run(self) -> Result<Output> {
        let display = self.display();

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command.stdin(if self.stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = command
            .spawn()
            .with_context(|| format!("spawning `{display}`"))?;

        if let Some(data) = &self.stdin_data
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin
                .write_all(data)
                .with_context(|| format!("writing stdin to `{display}`"))?;
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("waiting for `{display}`"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{display}` failed ({}): {}", output.status, stderr.trim());
        }
        Ok(output)
    }

    /// Human-readable command line for error messages.
    fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}
