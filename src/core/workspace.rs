//! Workspace - the loaded project plus where its flows build.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::project::{Project, MANIFEST_NAME};

/// Errors locating the project manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `HdlFlow.toml` in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },
}

/// Look for the manifest directly inside `dir`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let path = dir.join(MANIFEST_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        })
    }
}

/// A project and its build locations.
#[derive(Debug)]
pub struct Workspace {
    project: Project,

    /// Directory containing the manifest
    root: PathBuf,

    /// Parent of the per-flow build directories
    build_root: PathBuf,
}

impl Workspace {
    /// Load the workspace rooted at the manifest's directory.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let project = Project::load(manifest_path)?;
        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(Self::from_project(project, root))
    }

    /// Wrap an already loaded project.
    pub fn from_project(project: Project, root: PathBuf) -> Self {
        let build_root = root.join(".hdlflow").join("build");
        Workspace {
            project,
            root,
            build_root,
        }
    }

    /// Override the directory that holds per-flow build directories.
    ///
    /// Relative paths are taken from the workspace root.
    pub fn with_build_root(mut self, build_root: impl AsRef<Path>) -> Self {
        let build_root = build_root.as_ref();
        self.build_root = if build_root.is_absolute() {
            build_root.to_path_buf()
        } else {
            self.root.join(build_root)
        };
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Build directory of one flow.
    pub fn flow_dir(&self, flow: &str) -> PathBuf {
        self.build_root.join(flow)
    }

    /// Ensure a flow's build directory exists.
    pub fn ensure_flow_dir(&self, flow: &str) -> Result<PathBuf> {
        let dir = self.flow_dir(flow);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create build directory: {}", dir.display()))?;
        Ok(dir)
    }
}
