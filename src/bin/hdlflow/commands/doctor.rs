//! `hdlflow doctor` command

use anyhow::Result;

use hdlflow::builder::EnvContext;
use hdlflow::ops::{doctor, format_report};
use hdlflow::util::Shell;

pub fn execute(shell: &Shell) -> Result<()> {
    let env = EnvContext::from_process()?;
    let report = doctor(&env);

    print!("{}", format_report(&report, shell.is_verbose()));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
