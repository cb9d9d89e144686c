//! Riviera PRO simulation flow.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::builder::env::EnvContext;
use crate::builder::options::RunOptions;
use crate::builder::runner::CommandRunner;
use crate::builder::script::write_scripts;
use crate::builder::stage::{StageExecutor, StageState};
use crate::flows::Flow;
use crate::core::Project;
use crate::util::fs::{ensure_dir, relative_path};
use crate::util::shell::{Shell, Status};

/// Compile, elaborate and simulate a project with Riviera PRO.
pub struct RivieraProFlow<'a> {
    project: &'a Project,
    options: RunOptions,
    build_dir: PathBuf,
    env: EnvContext,
    shell: Arc<Shell>,
    state: StageState,
}

impl<'a> RivieraProFlow<'a> {
    pub const NAME: &'static str = "rivierapro";

    pub fn new(
        project: &'a Project,
        options: RunOptions,
        build_dir: PathBuf,
        env: EnvContext,
        shell: Arc<Shell>,
    ) -> Self {
        RivieraProFlow {
            project,
            options,
            build_dir,
            env,
            shell,
            state: StageState::NotStarted,
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Where the last `execute` stopped.
    pub fn state(&self) -> StageState {
        self.state
    }
}

impl Flow for RivieraProFlow<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn setup(&mut self) -> Result<()> {
        ensure_dir(&self.build_dir)
    }

    fn generate(&mut self) -> Result<()> {
        self.shell.status(
            Status::Generating,
            format!(
                "build scripts in {}",
                relative_path(self.env.cwd(), &self.build_dir).display()
            ),
        );
        write_scripts(self.project, &self.options, &self.build_dir)?;
        Ok(())
    }

    fn execute(&mut self, runner: &mut dyn CommandRunner) -> Result<()> {
        let span = self
            .shell
            .span(Status::Running, format!("{} ({})", self.project.name, self.options.step));

        let mut exec = StageExecutor::new(
            self.project,
            &self.options,
            &self.build_dir,
            self.env.clone(),
            runner,
        )
        .with_shell(Arc::clone(&self.shell));

        let result = exec.execute();
        self.state = exec.state();

        match result {
            Ok(_) => {
                span.finish_with_message(format!("{} {}", self.options.step, self.project.name));
                Ok(())
            }
            Err(err) => {
                span.abandon();
                Err(err.into())
            }
        }
    }
}
