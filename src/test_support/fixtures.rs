//! Test fixtures for common test scenarios.
//!
//! Fake toolchains (executable stubs in a temporary `bin` directory) and
//! small on-disk HDL projects.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::builder::env::EnvContext;
use crate::core::MANIFEST_NAME;

/// A temporary directory of stub executables.
///
/// Every stub exits successfully without doing anything. Resolution is
/// what matters to the code under test, not behavior.
pub struct FakeToolchain {
    dir: TempDir,
    bin: PathBuf,
}

impl FakeToolchain {
    /// Create a toolchain with one stub per name in `<tmp>/bin`.
    pub fn new(tools: &[&str]) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let bin = dir.path().join("bin");
        write_stubs(&bin, tools);
        FakeToolchain { dir, bin }
    }

    /// The temporary root; also the resolution directory of [`Self::env`].
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin
    }

    /// Add another directory of stubs next to `bin` and return its path.
    pub fn add_dir(&self, name: &str, tools: &[&str]) -> PathBuf {
        let dir = self.dir.path().join(name);
        write_stubs(&dir, tools);
        dir
    }

    /// An environment whose search path is only the stub directory.
    pub fn env(&self) -> EnvContext {
        self.env_with(vec![self.bin.clone()])
    }

    /// An environment with an explicit search path.
    pub fn env_with(&self, search_path: Vec<PathBuf>) -> EnvContext {
        EnvContext::with_search_path(search_path, self.dir.path().to_path_buf())
    }
}

fn write_stubs(dir: &Path, tools: &[&str]) {
    std::fs::create_dir_all(dir).expect("failed to create stub dir");
    for tool in tools {
        let path = dir.join(tool);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").expect("failed to write stub");
        make_executable(&path);
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod stub");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Fixture for a project on disk.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// HdlFlow.toml content.
    pub manifest: String,
    /// Source files (path relative to project root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    /// A project with the given manifest and no sources.
    pub fn new(manifest: impl Into<String>) -> Self {
        ProjectFixture {
            manifest: manifest.into(),
            files: BTreeMap::new(),
        }
    }

    /// A small mixed-language UART design with a testbench.
    pub fn uart() -> Self {
        ProjectFixture::new(
            r#"[project]
name = "uart"
toplevel = "tb_uart"

[defines]
WIDTH = 8

[generics]
G_BAUD = 115200

[plusargs]
UVM_TESTNAME = "smoke"

[[filesets]]
name = "rtl"
library = "uart_lib"
files = ["rtl/*.vhd", "rtl/*.v"]

[[filesets]]
name = "tb"
library = "work"
files = ["tb/*.sv"]
"#,
        )
        .with_file("rtl/uart_tx.vhd", "entity uart_tx is end entity;\n")
        .with_file("rtl/uart_rx.vhd", "entity uart_rx is end entity;\n")
        .with_file("rtl/baud.v", "module baud; endmodule\n")
        .with_file("tb/tb_uart.sv", "module tb_uart; endmodule\n")
    }

    /// Add a source file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write the project under `base` and return the manifest path.
    pub fn write_to(&self, base: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(base)?;
        let manifest_path = base.join(MANIFEST_NAME);
        std::fs::write(&manifest_path, &self.manifest)?;

        for (rel, content) in &self.files {
            let path = base.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }

        Ok(manifest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Project;

    #[test]
    fn test_uart_fixture_loads() {
        let tmp = TempDir::new().unwrap();
        let manifest = ProjectFixture::uart().write_to(tmp.path()).unwrap();

        let project = Project::load(&manifest).unwrap();
        assert_eq!(project.name, "uart");
        assert_eq!(project.vhdl_files().count(), 2);
        assert_eq!(project.filesets[1].files().len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_fake_toolchain_stubs_resolve() {
        let tools = FakeToolchain::new(&["vsim", "make"]);
        let env = tools.env();
        assert!(env.which("vsim").is_some());
        assert!(env.which("make").is_some());
    }
}
