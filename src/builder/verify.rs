//! Toolchain environment verification.

use crate::builder::env::EnvContext;
use crate::builder::errors::FlowError;

/// Executables every Riviera PRO run needs.
pub const REQUIRED_TOOLS: [&str; 5] = ["vlog", "vsim", "vcom", "vlib", "vmap"];

/// Riviera PRO executable commonly shadowed by an unrelated system binary
/// (coreutils ships a `vdir` too).
pub const CANARY: &str = "vdir";

/// Check that the Riviera PRO tools resolve, and resolve to one install.
///
/// A missing tool is fatal. A shadowed canary is not: the simulator's
/// directory is put in front of the search path and the run continues.
pub fn verify_toolchain(env: &mut EnvContext) -> Result<(), FlowError> {
    let missing: Vec<&str> = REQUIRED_TOOLS
        .iter()
        .copied()
        .filter(|tool| env.which(tool).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(FlowError::setup(format!(
            "Riviera PRO is not set up correctly: `{}` not found on PATH",
            missing.join("`, `")
        )));
    }

    let vsim = env
        .which("vsim")
        .ok_or_else(|| FlowError::setup("Riviera PRO is not set up correctly: `vsim` not found"))?;
    let Some(vsim_dir) = vsim.parent().map(|p| p.to_path_buf()) else {
        return Ok(());
    };

    let Some(vdir) = env.which(CANARY) else {
        tracing::debug!("`{}` not found on PATH, skipping shadowing check", CANARY);
        return Ok(());
    };

    if vdir.parent() != Some(vsim_dir.as_path()) {
        tracing::warn!(
            "Riviera PRO is not set up correctly. The '{}' command is pointing to {}, \
             which is not part of the Riviera PRO installation. Prepending {} to PATH.",
            CANARY,
            vdir.display(),
            vsim_dir.display()
        );
        env.prepend_search_path(vsim_dir);
    } else {
        tracing::debug!("Riviera PRO found in {}", vsim_dir.display());
    }

    Ok(())
}
