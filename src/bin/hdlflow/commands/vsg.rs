//! `hdlflow vhdl-style-guide` command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::cli::VsgArgs;
use crate::commands::Session;
use hdlflow::builder::{EnvContext, SystemRunner};
use hdlflow::flows::{Flow, VsgFlow, VsgOptions};
use hdlflow::util::fs::absolute_from;
use hdlflow::util::Shell;

/// Rule file precedence: `--rules` (or its environment variable), then
/// `[vsg] rules` from config, then the generated default.
pub fn resolve_rules(
    cli: Option<&Path>,
    config: Option<&Path>,
    cwd: &Path,
    root: &Path,
) -> Option<PathBuf> {
    match (cli, config) {
        (Some(cli), _) => Some(absolute_from(cwd, cli)),
        (None, Some(config)) => Some(absolute_from(root, config)),
        (None, None) => None,
    }
}

pub fn execute(args: VsgArgs, builddir: Option<&Path>, shell: &Arc<Shell>) -> Result<()> {
    let session = Session::load(builddir)?;
    let workspace = &session.workspace;

    let rules = resolve_rules(
        args.rules.as_deref(),
        session.config.vsg.rules.as_deref(),
        session.ctx.cwd(),
        workspace.root(),
    );
    let options = VsgOptions {
        output_format: args.output_format,
        fix: args.fix,
        rules,
        files: args.files,
    };

    let mut flow = VsgFlow::new(
        workspace.project(),
        options,
        workspace.flow_dir(VsgFlow::NAME),
        EnvContext::from_process()?,
        Arc::clone(shell),
    );
    flow.run(&mut SystemRunner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_rules_win() {
        let rules = resolve_rules(
            Some(Path::new("team.yml")),
            Some(Path::new("cfg.yml")),
            Path::new("/work/sub"),
            Path::new("/work"),
        );
        assert_eq!(rules, Some(PathBuf::from("/work/sub/team.yml")));
    }

    #[test]
    fn test_config_rules_relative_to_root() {
        let rules = resolve_rules(
            None,
            Some(Path::new("style/rules.yml")),
            Path::new("/work/sub"),
            Path::new("/work"),
        );
        assert_eq!(rules, Some(PathBuf::from("/work/style/rules.yml")));
    }

    #[test]
    fn test_no_rules_uses_generated() {
        assert_eq!(
            resolve_rules(None, None, Path::new("/a"), Path::new("/b")),
            None
        );
    }
}
