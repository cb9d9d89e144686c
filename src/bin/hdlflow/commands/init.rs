//! `hdlflow init` command

use anyhow::Result;

use crate::cli::InitArgs;
use hdlflow::ops::{default_name, init_project};
use hdlflow::util::fs::absolute_from;
use hdlflow::util::shell::Status;
use hdlflow::util::Shell;

pub fn execute(args: InitArgs, shell: &Shell) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = match args.path {
        Some(ref path) => absolute_from(&cwd, path),
        None => cwd,
    };

    let name = args.name.unwrap_or_else(|| default_name(&path));
    init_project(&path, &name)?;

    shell.status(
        Status::Created,
        format!("project `{}` in {}", name, path.display()),
    );
    Ok(())
}
