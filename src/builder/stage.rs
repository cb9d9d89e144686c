//! Staged compile, elaborate and simulate run.
//!
//! A run always verifies the toolchain, runs the `pre` hooks and compiles.
//! It stops there for the compile step; otherwise it exports the do-command,
//! invokes the requested step (or the GUI) and, after a simulation, runs the
//! `post` hooks. The first failing command aborts the run.

use std::path::Path;
use std::sync::Arc;

use crate::builder::env::{EnvContext, DO_CMD_VAR};
use crate::builder::errors::FlowError;
use crate::builder::hooks::HookRunner;
use crate::builder::options::{RunOptions, Stage};
use crate::builder::runner::CommandRunner;
use crate::builder::verify::verify_toolchain;
use crate::core::Project;
use crate::util::fs::absolute_from;
use crate::util::shell::{Shell, Status};

/// Hooks run before compilation.
pub const PRE_HOOK: &str = "pre";

/// Hooks run after a successful simulation.
pub const POST_HOOK: &str = "post";

/// Build-script target opening the simulator GUI.
pub const GUI_TARGET: &str = "gui";

/// Progress of a staged run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    NotStarted,
    Compiled,
    Elaborated,
    Simulated,
    /// A command failed; terminal.
    Aborted,
}

impl StageState {
    fn reached(stage: Stage) -> Self {
        match stage {
            Stage::Compile => StageState::Compiled,
            Stage::Elaborate => StageState::Elaborated,
            Stage::Simulate => StageState::Simulated,
        }
    }
}

/// Value exported as `DO_CMD` for a user do-command.
///
/// An existing path becomes `-do <absolute path>`; anything else is passed
/// as a quoted inline command.
pub fn do_command_value(do_command: &str, cwd: &Path) -> String {
    let path = absolute_from(cwd, Path::new(do_command));
    if path.exists() {
        format!("-do {}", path.display())
    } else {
        format!("-do '{}'", do_command)
    }
}

/// Drives one run through its stages.
pub struct StageExecutor<'a, R> {
    project: &'a Project,
    options: &'a RunOptions,
    build_dir: &'a Path,
    env: EnvContext,
    runner: R,
    shell: Option<Arc<Shell>>,
    state: StageState,
}

impl<'a, R: CommandRunner> StageExecutor<'a, R> {
    /// Commands run inside `build_dir`, which must already hold the
    /// generated build scripts.
    pub fn new(
        project: &'a Project,
        options: &'a RunOptions,
        build_dir: &'a Path,
        env: EnvContext,
        runner: R,
    ) -> Self {
        StageExecutor {
            project,
            options,
            build_dir,
            env,
            runner,
            shell: None,
            state: StageState::NotStarted,
        }
    }

    /// Print stage progress to `shell`.
    pub fn with_shell(mut self, shell: Arc<Shell>) -> Self {
        self.shell = Some(shell);
        self
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// The run's environment, including any search-path correction and
    /// exported do-command.
    pub fn env(&self) -> &EnvContext {
        &self.env
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run to the requested step. Any error leaves the executor `Aborted`.
    pub fn execute(&mut self) -> Result<StageState, FlowError> {
        match self.drive() {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(err) => {
                tracing::debug!("run aborted in state {:?}: {}", self.state, err);
                self.state = StageState::Aborted;
                Err(err)
            }
        }
    }

    fn drive(&mut self) -> Result<StageState, FlowError> {
        verify_toolchain(&mut self.env)?;

        let project = self.project;
        let options = self.options;
        let hooks = HookRunner::new(&project.hooks, self.build_dir);

        hooks.run(PRE_HOOK, &self.env, &mut self.runner)?;

        self.progress(Status::Compiling, project.name.as_str());
        self.make(Stage::Compile.target())?;
        self.state = StageState::Compiled;
        if options.step == Stage::Compile {
            return Ok(StageState::Compiled);
        }

        if let Some(do_command) = options.do_command.as_deref().filter(|d| !d.is_empty()) {
            let value = do_command_value(do_command, self.env.cwd());
            tracing::debug!("exporting {}={}", DO_CMD_VAR, value);
            self.env.export(DO_CMD_VAR, value);
        }

        let target = if options.gui {
            GUI_TARGET
        } else {
            options.step.target()
        };
        let status = match options.step {
            Stage::Elaborate if !options.gui => Status::Elaborating,
            _ => Status::Simulating,
        };
        let label = project.toplevel.as_deref().unwrap_or(project.name.as_str());
        self.progress(status, label);
        self.make(target)?;

        if options.step == Stage::Simulate {
            hooks.run(POST_HOOK, &self.env, &mut self.runner)?;
        }

        Ok(StageState::reached(options.step))
    }

    fn make(&mut self, target: &str) -> Result<(), FlowError> {
        let cmd = self.env.command("make").arg(target).cwd(self.build_dir);
        let cmd = self
            .env
            .apply(cmd)
            .map_err(|e| FlowError::setup(format!("{:#}", e)))?;

        tracing::info!("Running `make {}` in {}", target, self.build_dir.display());
        self.runner.run(&cmd)
    }

    fn progress(&self, status: Status, msg: &str) {
        if let Some(ref shell) = self.shell {
            shell.status(status, msg);
        }
    }
}
