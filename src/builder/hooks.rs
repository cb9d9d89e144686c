//! Lifecycle hook execution.

use std::path::Path;

use crate::builder::env::EnvContext;
use crate::builder::errors::FlowError;
use crate::builder::runner::CommandRunner;
use crate::core::HookSet;
use crate::util::fs::absolute_from;
use crate::util::process::ProcessBuilder;

/// Runs the shell commands bound to a lifecycle point.
#[derive(Debug, Clone, Copy)]
pub struct HookRunner<'a> {
    hooks: &'a HookSet,
    cwd: &'a Path,
}

impl<'a> HookRunner<'a> {
    /// Hooks run inside `cwd`, normally the flow's build directory.
    pub fn new(hooks: &'a HookSet, cwd: &'a Path) -> Self {
        HookRunner { hooks, cwd }
    }

    /// Run every command registered for `name`, in declaration order.
    ///
    /// No registered commands is success. The first failing command stops
    /// the sequence and is returned as the error.
    pub fn run(
        &self,
        name: &str,
        env: &EnvContext,
        runner: &mut dyn CommandRunner,
    ) -> Result<(), FlowError> {
        for command in self.hooks.get(name) {
            let mut tokens = command.split_whitespace();
            let Some(program) = tokens.next() else {
                tracing::debug!("skipping empty {} hook", name);
                continue;
            };

            tracing::info!("Running {} hook: {}", name, command);
            let cmd = self.command(program, env).args(tokens).cwd(self.cwd);
            let cmd = env.apply(cmd).map_err(|e| FlowError::setup(format!("{:#}", e)))?;
            runner.run(&cmd)?;
        }
        Ok(())
    }

    /// A program given as a path (`./check.sh`, `scripts/gen`) is taken
    /// relative to the hook directory; a bare name goes through the search
    /// path.
    fn command(&self, program: &str, env: &EnvContext) -> ProcessBuilder {
        if program.contains(std::path::is_separator) {
            ProcessBuilder::new(absolute_from(self.cwd, Path::new(program)))
        } else {
            env.command(program)
        }
    }
}
