//! hdlflow CLI - build orchestration for HDL simulation toolchains

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use hdlflow::builder::FlowError;
use hdlflow::core::ManifestError;
use hdlflow::util::diagnostic::{emit, suggestions, Diagnostic};
use hdlflow::util::Shell;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.quiet, cli.verbose);
    let shell = Arc::new(Shell::from_flags(cli.quiet, cli.verbose, cli.color));

    if let Err(e) = run(cli, &shell) {
        emit(&to_diagnostic(&e), shell.is_colored());
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "hdlflow=warn",
        (false, 0) => "hdlflow=info",
        (false, 1) => "hdlflow=debug",
        (false, _) => "hdlflow=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn to_diagnostic(err: &anyhow::Error) -> Diagnostic {
    if let Some(flow_err) = err.downcast_ref::<FlowError>() {
        return flow_err.to_diagnostic();
    }
    if err.downcast_ref::<ManifestError>().is_some() {
        return Diagnostic::error(err.to_string()).with_suggestion(suggestions::NO_MANIFEST);
    }
    Diagnostic::error(format!("{:#}", err))
}

fn run(cli: Cli, shell: &Arc<Shell>) -> Result<()> {
    let builddir = cli.builddir.as_deref();

    match cli.command {
        Commands::RivieraPro(args) => {
            commands::rivierapro::execute(args, cli.verbose, builddir, shell)
        }
        Commands::VhdlStyleGuide(args) => commands::vsg::execute(args, builddir, shell),
        Commands::Doctor => commands::doctor::execute(shell),
        Commands::Init(args) => commands::init::execute(args, shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
