//! Command implementations

pub mod completions;
pub mod doctor;
pub mod init;
pub mod rivierapro;
pub mod vsg;

use std::path::Path;

use anyhow::Result;

use hdlflow::core::Workspace;
use hdlflow::util::config::{load_config, Config};
use hdlflow::util::fs::absolute_from;
use hdlflow::util::GlobalContext;

/// Everything a flow command needs from its surroundings.
pub struct Session {
    pub ctx: GlobalContext,
    pub workspace: Workspace,
    pub config: Config,
}

impl Session {
    /// Find and load the project around the current directory.
    ///
    /// The build root is `--builddir` when given (relative to the current
    /// directory), else `[build] dir` from config (relative to the project
    /// root), else `.hdlflow/build` in the project root.
    pub fn load(builddir: Option<&Path>) -> Result<Self> {
        let ctx = GlobalContext::new()?;
        let manifest_path = ctx.find_manifest()?;
        let mut workspace = Workspace::new(&manifest_path)?;

        let config = load_config(
            &ctx.config_path(),
            &ctx.project_config_path(workspace.root()),
        );

        if let Some(dir) = builddir {
            workspace = workspace.with_build_root(absolute_from(ctx.cwd(), dir));
        } else if let Some(ref dir) = config.build.dir {
            workspace = workspace.with_build_root(dir);
        }
        tracing::debug!("build root: {}", workspace.build_root().display());

        Ok(Session {
            ctx,
            workspace,
            config,
        })
    }
}
