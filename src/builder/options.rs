//! Per-invocation run options.

use std::fmt;

/// A step of the staged run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, clap::ValueEnum)]
pub enum Stage {
    Compile,
    Elaborate,
    #[default]
    Simulate,
}

impl Stage {
    /// Name of the build-script target running this stage.
    pub fn target(&self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Elaborate => "elaborate",
            Stage::Simulate => "simulate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

/// Raw extra flags per tool, appended verbatim after computed flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolFlags {
    pub vlog: String,
    pub vcom: String,
    pub vmap: String,
    pub vopt: String,
    pub vsim: String,
}

/// Options of one Riviera PRO run. Built once from the command line and
/// never modified afterwards.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Verbosity level; zero asks the tools to be quiet
    pub verbose: u8,
    /// Open the simulator GUI instead of running in batch mode
    pub gui: bool,
    /// Record waveforms during simulation
    pub wave: bool,
    pub extra_flags: ToolFlags,
    /// Fixed seed for the simulator's random generator
    pub seed: u64,
    /// Ask the simulator to pick a random seed
    pub random_seed: bool,
    /// Do-script path or literal simulator command
    pub do_command: Option<String>,
    /// Verilog timescale override
    pub timescale: Option<String>,
    pub step: Stage,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            verbose: 0,
            gui: false,
            wave: false,
            extra_flags: ToolFlags::default(),
            seed: 1,
            random_seed: false,
            do_command: None,
            timescale: None,
            step: Stage::Simulate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Compile < Stage::Elaborate);
        assert!(Stage::Elaborate < Stage::Simulate);
        assert_eq!(Stage::default(), Stage::Simulate);
    }

    #[test]
    fn test_stage_targets() {
        assert_eq!(Stage::Compile.target(), "compile");
        assert_eq!(Stage::Elaborate.to_string(), "elaborate");
        assert_eq!(Stage::Simulate.target(), "simulate");
    }

    #[test]
    fn test_default_options() {
        let opts = RunOptions::default();
        assert_eq!(opts.seed, 1);
        assert!(!opts.random_seed);
        assert!(!opts.gui);
        assert!(opts.do_command.is_none());
        assert_eq!(opts.step, Stage::Simulate);
    }
}
