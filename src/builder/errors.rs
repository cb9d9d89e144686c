//! Flow execution errors.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// A fatal failure while running a flow.
///
/// There is no local recovery: the run stops at the first error and the
/// failing command is reported to the caller as-is.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum FlowError {
    /// The toolchain is not resolvable or misconfigured.
    #[error("{message}")]
    #[diagnostic(code(hdlflow::setup))]
    Setup { message: String },

    /// An external command (stage or hook) exited unsuccessfully.
    #[error("`{command}` failed with {}", describe_exit(.code))]
    #[diagnostic(code(hdlflow::command))]
    Command { command: String, code: Option<i32> },

    /// An external command could not be started at all.
    #[error("failed to execute `{command}`")]
    #[diagnostic(code(hdlflow::spawn))]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl FlowError {
    /// Shorthand for a setup failure.
    pub fn setup(message: impl Into<String>) -> Self {
        FlowError::Setup {
            message: message.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FlowError::Setup { message } => Diagnostic::error(message.clone())
                .with_suggestion(suggestions::TOOLCHAIN_MISSING)
                .with_suggestion(suggestions::RUN_DOCTOR),
            FlowError::Command { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::STAGE_FAILED)
            }
            FlowError::Spawn { source, .. } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_suggestion(suggestions::RUN_DOCTOR),
        }
    }
}
