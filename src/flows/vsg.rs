//! VHDL style guide flow.
//!
//! Runs `vsg` over the project's VHDL sources, or over an explicit file
//! list, with a rule configuration file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::builder::env::EnvContext;
use crate::builder::runner::CommandRunner;
use crate::core::Project;
use crate::flows::Flow;
use crate::util::fs::{absolute_from, ensure_dir, write_string};
use crate::util::shell::{Shell, Status};

/// File list handed to `vsg`.
pub const FILES_JSON: &str = "files.json";

/// Rule configuration written into the build directory.
pub const RULES_YML: &str = "rules.yml";

/// Environment variable naming a rule configuration file.
pub const RULES_ENV: &str = "HDLFLOW_VSG_RULES";

const DEFAULT_RULES: &str = "\
# Generated by hdlflow. Point --rules at your own file to customize.
rule:
  global:
    indentStyle: spaces
    indentSize: 2
";

/// `vsg` report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Vsg,
    Syntastic,
    Summary,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Vsg => "vsg",
            OutputFormat::Syntastic => "syntastic",
            OutputFormat::Summary => "summary",
        }
    }
}

/// Options of one style-guide run.
#[derive(Debug, Clone, Default)]
pub struct VsgOptions {
    pub output_format: OutputFormat,
    /// Rewrite the sources instead of reporting
    pub fix: bool,
    /// Rule configuration file; the generated `rules.yml` when unset
    pub rules: Option<PathBuf>,
    /// Check these files instead of the project's VHDL sources
    pub files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct FileList {
    file_list: Vec<String>,
}

/// Run the VHDL style guide checker.
pub struct VsgFlow<'a> {
    project: &'a Project,
    options: VsgOptions,
    build_dir: PathBuf,
    env: EnvContext,
    shell: Arc<Shell>,
}

impl<'a> VsgFlow<'a> {
    pub const NAME: &'static str = "vhdl-style-guide";

    pub fn new(
        project: &'a Project,
        options: VsgOptions,
        build_dir: PathBuf,
        env: EnvContext,
        shell: Arc<Shell>,
    ) -> Self {
        VsgFlow {
            project,
            options,
            build_dir,
            env,
            shell,
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Render `files.json` for the project's VHDL sources.
    pub fn render_file_list(&self) -> Result<String> {
        let list = FileList {
            file_list: self
                .project
                .vhdl_files()
                .map(|f| absolute_from(self.env.cwd(), &f.path).display().to_string())
                .collect(),
        };
        serde_json::to_string_pretty(&list).context("failed to serialize file list")
    }

    /// Arguments passed to `vsg`.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.options.fix {
            args.push("--fix".to_string());
        } else {
            args.push("-ap".to_string());
            args.push("-of".to_string());
            args.push(self.options.output_format.as_str().to_string());
        }

        let rules = match self.options.rules {
            Some(ref rules) => rules.display().to_string(),
            None => RULES_YML.to_string(),
        };
        args.push("-c".to_string());
        args.push(rules);

        if self.options.files.is_empty() {
            args.push(FILES_JSON.to_string());
        } else {
            args.push("-f".to_string());
            args.extend(
                self.options
                    .files
                    .iter()
                    .map(|f| absolute_from(self.env.cwd(), f).display().to_string()),
            );
        }
        args
    }
}

impl Flow for VsgFlow<'_> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn setup(&mut self) -> Result<()> {
        ensure_dir(&self.build_dir)
    }

    fn generate(&mut self) -> Result<()> {
        self.shell.status(
            Status::Generating,
            format!("{} and {}", FILES_JSON, RULES_YML),
        );
        write_string(&self.build_dir.join(FILES_JSON), &self.render_file_list()?)?;
        write_string(&self.build_dir.join(RULES_YML), DEFAULT_RULES)?;
        Ok(())
    }

    fn execute(&mut self, runner: &mut dyn CommandRunner) -> Result<()> {
        let cmd = self
            .env
            .command("vsg")
            .args(self.arguments())
            .cwd(&self.build_dir);
        let cmd = self.env.apply(cmd)?;

        tracing::debug!("{}", cmd.display_command());
        let status = if self.options.fix {
            Status::Running
        } else {
            Status::Linting
        };
        self.shell.status(status, &self.project.name);

        runner.run(&cmd)?;
        Ok(())
    }
}
