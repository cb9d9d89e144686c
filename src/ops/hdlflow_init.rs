//! Implementation of `hdlflow init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::project::generate_manifest;
use crate::core::MANIFEST_NAME;
use crate::util::fs::write_string;

const GITIGNORE: &str = "# hdlflow build artifacts
.hdlflow/build/
";

/// Create a starter project in an existing directory.
///
/// Writes `HdlFlow.toml` and creates the `rtl` and `tb` directories the
/// starter manifest points at. Fails if a manifest already exists.
pub fn init_project(path: &Path, name: &str) -> Result<PathBuf> {
    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    for dir in ["rtl", "tb"] {
        fs::create_dir_all(path.join(dir))
            .with_context(|| format!("failed to create {} directory", dir))?;
    }

    write_string(&manifest_path, &generate_manifest(name))?;

    let gitignore = path.join(".gitignore");
    if !gitignore.exists() {
        write_string(&gitignore, GITIGNORE)?;
    }

    Ok(manifest_path)
}

/// Project name derived from a directory name.
pub fn default_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().replace(['-', ' ', '.'], "_"))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "design".to_string())
}
