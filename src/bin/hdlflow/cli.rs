//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use hdlflow::builder::Stage;
use hdlflow::flows::vsg::{OutputFormat, RULES_ENV};
use hdlflow::util::shell::ColorChoice;

/// hdlflow - build orchestration for HDL simulation toolchains
#[derive(Parser)]
#[command(name = "hdlflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace); zero keeps the tools quiet
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to color output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Directory holding the per-flow build directories
    #[arg(long, value_name = "DIR", global = true)]
    pub builddir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Riviera PRO HDL simulation flow
    #[command(name = "rivierapro")]
    RivieraPro(RivieraProArgs),

    /// VHDL style guide flow
    #[command(name = "vhdl-style-guide")]
    VhdlStyleGuide(VsgArgs),

    /// Check that the simulator toolchain is set up
    Doctor,

    /// Create an HdlFlow.toml in an existing directory
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RivieraProArgs {
    /// Flow step to run
    #[arg(long, value_enum, default_value_t = Stage::Simulate)]
    pub step: Stage,

    /// Dump waveforms
    #[arg(short, long)]
    pub wave: bool,

    /// Open the project in the Riviera PRO GUI
    #[arg(long)]
    pub gui: bool,

    /// Extra flags for the vsim command
    #[arg(long, value_name = "FLAGS", default_value = "", allow_hyphen_values = true)]
    pub vsim_flags: String,

    /// Extra flags for the vopt command
    #[arg(long, value_name = "FLAGS", default_value = "", allow_hyphen_values = true)]
    pub vopt_flags: String,

    /// Extra flags for the vmap command
    #[arg(long, value_name = "FLAGS", default_value = "", allow_hyphen_values = true)]
    pub vmap_flags: String,

    /// Extra flags for the vcom command
    #[arg(long, value_name = "FLAGS", default_value = "", allow_hyphen_values = true)]
    pub vcom_flags: String,

    /// Extra flags for the vlog command
    #[arg(long, value_name = "FLAGS", default_value = "", allow_hyphen_values = true)]
    pub vlog_flags: String,

    /// Seed to initialize the random generator
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Let the simulator pick a random seed
    #[arg(long)]
    pub random_seed: bool,

    /// Do-script file or literal command to start the simulation
    #[arg(long = "do", value_name = "COMMAND")]
    pub do_command: Option<String>,

    /// Simulator timescale for Verilog
    #[arg(long)]
    pub timescale: Option<String>,
}

#[derive(Args, Debug)]
pub struct VsgArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Vsg)]
    pub output_format: OutputFormat,

    /// Fix style formatting (modifies the sources)
    #[arg(long)]
    pub fix: bool,

    /// Rule configuration file
    #[arg(short, long, env = RULES_ENV)]
    pub rules: Option<PathBuf>,

    /// Check these files instead of the project's VHDL sources
    #[arg(short, long, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
