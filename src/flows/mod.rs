//! Tool flows.
//!
//! A flow prepares its build directory, generates the files its tools
//! consume and then runs them. Flows never spawn processes themselves;
//! every command goes through the [`CommandRunner`] handed to `execute`.

pub mod rivierapro;
pub mod vsg;

use anyhow::Result;

use crate::builder::runner::CommandRunner;

pub use rivierapro::RivieraProFlow;
pub use vsg::{OutputFormat, VsgFlow, VsgOptions};

/// A runnable tool flow.
pub trait Flow {
    /// Flow name, also the name of its build directory.
    fn name(&self) -> &'static str;

    /// Create the build directory.
    fn setup(&mut self) -> Result<()>;

    /// Write the files the tools read.
    fn generate(&mut self) -> Result<()>;

    /// Run the tools.
    fn execute(&mut self, runner: &mut dyn CommandRunner) -> Result<()>;

    /// Setup, generate and execute, stopping at the first error.
    fn run(&mut self, runner: &mut dyn CommandRunner) -> Result<()> {
        tracing::debug!("running flow `{}`", self.name());
        self.setup()?;
        self.generate()?;
        self.execute(runner)
    }
}
