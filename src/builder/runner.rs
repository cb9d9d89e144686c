//! External command execution.

use crate::builder::errors::FlowError;
use crate::util::process::ProcessBuilder;

/// Runs one external command to completion.
///
/// Flows never spawn processes directly; they hand fully prepared
/// commands to a runner, which tests replace with a recorder.
pub trait CommandRunner {
    /// Run `cmd` and wait for it. A non-zero exit is an error.
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<(), FlowError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<(), FlowError> {
        (**self).run(cmd)
    }
}

/// Runs commands as real child processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<(), FlowError> {
        let command = cmd.display_command();
        tracing::debug!(cwd = ?cmd.get_cwd(), "executing `{}`", command);

        let status = cmd.status().map_err(|source| FlowError::Spawn {
            command: command.clone(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(FlowError::Command {
                command,
                code: status.code(),
            })
        }
    }
}
