//! Test utilities for hdlflow unit tests.
//!
//! Flows hand every external command to a [`CommandRunner`]; the
//! [`RecordingRunner`] here stands in for real processes, records what
//! would have run and can be told to fail selected commands.
//!
//! # Example
//!
//! ```rust,ignore
//! use hdlflow::test_support::{CommandPattern, RecordingRunner};
//!
//! let mut runner = RecordingRunner::new();
//! runner.fail_on(CommandPattern::StartsWith("make sim".into()), 2);
//! // Drive a flow with `runner`, then inspect `runner.calls()`.
//! ```

pub mod fixtures;

use std::path::Path;

use crate::builder::errors::FlowError;
use crate::builder::runner::CommandRunner;
use crate::util::process::ProcessBuilder;

pub use fixtures::*;

/// Pattern for matching recorded commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// Command line with the program reduced to its file name, so recorded
/// calls do not depend on where a tool was resolved.
pub fn short_command(cmd: &ProcessBuilder) -> String {
    let program = cmd
        .get_program()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cmd.get_program().display().to_string());

    std::iter::once(program)
        .chain(cmd.get_args().iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A runner that records commands instead of executing them.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Vec<ProcessBuilder>,
    calls: Vec<String>,
    failures: Vec<(CommandPattern, i32)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Make commands matching `pattern` exit with `code`.
    pub fn fail_on(&mut self, pattern: CommandPattern, code: i32) -> &mut Self {
        self.failures.push((pattern, code));
        self
    }

    /// Commands run so far, as short command lines.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Commands run so far, with their environment and working directory.
    pub fn commands(&self) -> &[ProcessBuilder] {
        &self.commands
    }

    /// Working directory of the `n`th command.
    pub fn cwd_of(&self, n: usize) -> Option<&Path> {
        self.commands.get(n).and_then(|c| c.get_cwd())
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<(), FlowError> {
        let line = short_command(cmd);
        self.calls.push(line.clone());
        self.commands.push(cmd.clone());

        match self.failures.iter().find(|(p, _)| p.matches(&line)) {
            Some((_, code)) => Err(FlowError::Command {
                command: line,
                code: Some(*code),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_pattern() {
        assert!(CommandPattern::Exact("make compile".into()).matches("make compile"));
        assert!(!CommandPattern::Exact("make".into()).matches("make compile"));
        assert!(CommandPattern::StartsWith("make".into()).matches("make gui"));
        assert!(CommandPattern::Contains("gui".into()).matches("make gui"));
        assert!(CommandPattern::Regex(r"^make (gui|simulate)$".into()).matches("make gui"));
        assert!(CommandPattern::Any.matches("anything"));
    }

    #[test]
    fn test_recording_runner_failures() {
        let mut runner = RecordingRunner::new();
        runner.fail_on(CommandPattern::Contains("simulate".into()), 4);

        runner
            .run(&ProcessBuilder::new("/opt/riviera/bin/make").arg("compile").cwd("/b"))
            .unwrap();
        let err = runner
            .run(&ProcessBuilder::new("make").arg("simulate"))
            .unwrap_err();

        assert!(matches!(err, FlowError::Command { code: Some(4), .. }));
        assert_eq!(runner.calls(), ["make compile", "make simulate"]);
        assert_eq!(runner.cwd_of(0), Some(Path::new("/b")));
        assert_eq!(runner.cwd_of(1), None);
    }
}
