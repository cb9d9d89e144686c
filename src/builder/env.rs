//! Environment handed to external tools.
//!
//! Flows never touch the process-wide environment. The search path and
//! the variables exported to children live in an [`EnvContext`], which is
//! applied to every [`ProcessBuilder`] right before it runs.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::process::ProcessBuilder;

/// Search-path variable.
pub const PATH_VAR: &str = "PATH";

/// Variable carrying the simulator do-command.
pub const DO_CMD_VAR: &str = "DO_CMD";

/// Search path, resolution directory and exported variables for a run.
#[derive(Debug, Clone)]
pub struct EnvContext {
    search_path: Vec<PathBuf>,
    cwd: PathBuf,
    exports: BTreeMap<String, String>,
    prepended: Option<PathBuf>,
}

impl EnvContext {
    /// Snapshot the current process environment.
    pub fn from_process() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let search_path = std::env::var_os(PATH_VAR)
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();

        Ok(EnvContext::with_search_path(search_path, cwd))
    }

    /// An environment with an explicit search path.
    pub fn with_search_path(search_path: Vec<PathBuf>, cwd: PathBuf) -> Self {
        EnvContext {
            search_path,
            cwd,
            exports: BTreeMap::new(),
            prepended: None,
        }
    }

    /// Directories searched for executables, in order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Directory relative paths are resolved against.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The search path joined into a `PATH` value.
    pub fn joined_search_path(&self) -> Result<OsString> {
        std::env::join_paths(&self.search_path).context("invalid directory in search path")
    }

    /// Resolve an executable on the search path.
    pub fn which(&self, name: &str) -> Option<PathBuf> {
        let paths = self.joined_search_path().ok()?;
        which::which_in(name, Some(paths), &self.cwd).ok()
    }

    /// Put `dir` in front of the search path.
    ///
    /// Existing entries are kept. Only the first call has an effect; later
    /// calls return `false` and leave the path untouched.
    pub fn prepend_search_path(&mut self, dir: impl Into<PathBuf>) -> bool {
        if self.prepended.is_some() {
            return false;
        }
        let dir = dir.into();
        self.search_path.insert(0, dir.clone());
        self.prepended = Some(dir);
        true
    }

    /// The directory prepended to the search path, if any.
    pub fn prepended(&self) -> Option<&Path> {
        self.prepended.as_deref()
    }

    /// Export a variable to every child started from this context.
    pub fn export(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.exports.insert(key.into(), value.into());
    }

    /// An exported variable.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.exports.get(key).map(String::as_str)
    }

    /// Apply the search path and exports to a child process.
    pub fn apply(&self, mut cmd: ProcessBuilder) -> Result<ProcessBuilder> {
        let path = self.joined_search_path()?;
        cmd = cmd.env(PATH_VAR, path);
        for (key, value) in &self.exports {
            cmd = cmd.env(key, value);
        }
        Ok(cmd)
    }

    /// Build a command for `program`, resolved on the search path when
    /// possible.
    pub fn command(&self, program: &str) -> ProcessBuilder {
        match self.which(program) {
            Some(path) => ProcessBuilder::new(path),
            None => ProcessBuilder::new(program),
        }
    }
}
