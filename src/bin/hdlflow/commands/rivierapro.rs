//! `hdlflow rivierapro` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::RivieraProArgs;
use crate::commands::Session;
use hdlflow::builder::{EnvContext, RunOptions, SystemRunner, ToolFlags};
use hdlflow::flows::{Flow, RivieraProFlow};
use hdlflow::util::config::{cli_or_config, RivieraProConfig};
use hdlflow::util::Shell;

/// Build run options from the command line, falling back to config for
/// values left empty.
pub fn run_options(args: RivieraProArgs, verbose: u8, config: &RivieraProConfig) -> RunOptions {
    let extra_flags = ToolFlags {
        vlog: cli_or_config(&args.vlog_flags, config.vlog_flags.as_ref()),
        vcom: cli_or_config(&args.vcom_flags, config.vcom_flags.as_ref()),
        vmap: cli_or_config(&args.vmap_flags, config.vmap_flags.as_ref()),
        vopt: cli_or_config(&args.vopt_flags, config.vopt_flags.as_ref()),
        vsim: cli_or_config(&args.vsim_flags, config.vsim_flags.as_ref()),
    };

    RunOptions {
        verbose,
        gui: args.gui,
        wave: args.wave,
        extra_flags,
        seed: args.seed,
        random_seed: args.random_seed,
        do_command: args.do_command,
        timescale: args.timescale.or_else(|| config.timescale.clone()),
        step: args.step,
    }
}

pub fn execute(
    args: RivieraProArgs,
    verbose: u8,
    builddir: Option<&std::path::Path>,
    shell: &Arc<Shell>,
) -> Result<()> {
    let session = Session::load(builddir)?;
    let options = run_options(args, verbose, &session.config.rivierapro);
    let env = EnvContext::from_process()?;

    let workspace = &session.workspace;
    let mut flow = RivieraProFlow::new(
        workspace.project(),
        options,
        workspace.flow_dir(RivieraProFlow::NAME),
        env,
        Arc::clone(shell),
    );

    flow.run(&mut SystemRunner)
}
