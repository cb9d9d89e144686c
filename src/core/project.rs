//! HdlFlow.toml project description.
//!
//! The project is the read-only input of every flow: source filesets and the
//! library each one compiles into, the named value maps handed to the tools
//! (defines, generics, parameters, plus-args) and the lifecycle hooks.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::glob_files;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "HdlFlow.toml";

/// A scalar manifest value rendered verbatim on tool command lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            // `{:?}` keeps the decimal point on whole numbers (`1.0`, not `1`).
            ScalarValue::Float(x) => write!(f, "{:?}", x),
            ScalarValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Integer(i)
    }
}

/// Named values, ordered by name.
pub type ValueMap = BTreeMap<String, ScalarValue>;

/// Source language of a design file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    Verilog,
    SystemVerilog,
    Vhdl,
}

impl FileKind {
    /// Classify a file by extension.
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "v" | "vh" => Some(FileKind::Verilog),
            "sv" | "svh" => Some(FileKind::SystemVerilog),
            "vhd" | "vhdl" => Some(FileKind::Vhdl),
            _ => None,
        }
    }

    /// Whether files of this kind are compiled with `vlog`.
    pub fn is_verilog_family(&self) -> bool {
        matches!(self, FileKind::Verilog | FileKind::SystemVerilog)
    }
}

/// A compilation library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    name: String,
    /// Location of a precompiled library (external libraries only).
    path: Option<PathBuf>,
}

impl Library {
    /// A library compiled from project sources.
    pub fn new(name: impl Into<String>) -> Self {
        Library {
            name: name.into(),
            path: None,
        }
    }

    /// A precompiled library living outside the project.
    pub fn external(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Library {
            name: name.into(),
            path: Some(path.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// A design source file with its resolved language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: FileKind,
}

/// A named group of source files bound to at most one library.
#[derive(Debug, Clone)]
pub struct FileSet {
    name: String,
    library: Option<Library>,
    files: Vec<SourceFile>,
}

impl FileSet {
    /// Create an empty fileset.
    pub fn new(name: impl Into<String>, library: Option<Library>) -> Self {
        FileSet {
            name: name.into(),
            library,
            files: Vec::new(),
        }
    }

    /// Add a source file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, kind: FileKind) -> Self {
        self.files.push(SourceFile {
            path: path.into(),
            kind,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The library this fileset compiles into, if one is assigned.
    pub fn vhdl_library(&self) -> Option<&Library> {
        self.library.as_ref()
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Files of one language, in declaration order.
    pub fn files_of(&self, kind: FileKind) -> impl Iterator<Item = &SourceFile> {
        self.files.iter().filter(move |f| f.kind == kind)
    }
}

/// Shell commands bound to named lifecycle points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookSet(BTreeMap<String, Vec<String>>);

impl HookSet {
    /// Create an empty hook set.
    pub fn new() -> Self {
        HookSet(BTreeMap::new())
    }

    /// Register a command for a lifecycle point, after any already declared.
    pub fn add(&mut self, name: impl Into<String>, command: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(command.into());
    }

    /// Commands declared for `name`; empty when none are registered.
    pub fn get(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// The libraries of the default design.
#[derive(Debug, Clone, Default)]
pub struct Design {
    libraries: BTreeMap<String, Library>,
    external_libraries: BTreeMap<String, Library>,
}

impl Design {
    /// Libraries compiled from project sources.
    pub fn vhdl_libraries(&self) -> &BTreeMap<String, Library> {
        &self.libraries
    }

    /// Precompiled libraries mapped into the simulator.
    pub fn external_vhdl_libraries(&self) -> &BTreeMap<String, Library> {
        &self.external_libraries
    }

    pub fn add_library(&mut self, library: Library) {
        self.libraries.insert(library.name().to_string(), library);
    }

    pub fn add_external_library(&mut self, library: Library) {
        self.external_libraries
            .insert(library.name().to_string(), library);
    }
}

/// Co-simulation adapter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CocotbConfig {
    pub enabled: bool,
    /// Python test module
    pub module: Option<String>,
    /// `verilog` or `vhdl`; inferred from the sources when unset
    pub toplevel_lang: Option<String>,
}

/// A loaded project.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    /// Simulation toplevel design unit
    pub toplevel: Option<String>,
    pub defines: ValueMap,
    pub generics: ValueMap,
    pub parameters: ValueMap,
    pub plusargs: ValueMap,
    pub hooks: HookSet,
    pub filesets: Vec<FileSet>,
    pub design: Design,
    pub cocotb: CocotbConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    project: RawProject,
    #[serde(default)]
    defines: ValueMap,
    #[serde(default)]
    generics: ValueMap,
    #[serde(default)]
    parameters: ValueMap,
    #[serde(default)]
    plusargs: ValueMap,
    #[serde(default)]
    hooks: HookSet,
    #[serde(default)]
    filesets: Vec<RawFileSet>,
    #[serde(default, rename = "external-libraries")]
    external_libraries: BTreeMap<String, PathBuf>,
    #[serde(default)]
    cocotb: CocotbConfig,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    name: String,
    #[serde(default)]
    toplevel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFileSet {
    name: String,
    #[serde(default)]
    library: Option<String>,
    #[serde(default)]
    files: Vec<String>,
}

impl Project {
    /// Load a project from an `HdlFlow.toml` file.
    ///
    /// File patterns are resolved relative to the manifest's directory.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(manifest_path)
            .with_context(|| format!("failed to read manifest: {}", manifest_path.display()))?;
        let root = manifest_path.parent().unwrap_or(Path::new("."));

        Self::parse(&contents, root)
            .with_context(|| format!("failed to parse manifest: {}", manifest_path.display()))
    }

    /// Parse manifest text, resolving file patterns against `root`.
    pub fn parse(contents: &str, root: &Path) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents)?;

        let mut design = Design::default();
        let mut filesets = Vec::with_capacity(raw.filesets.len());

        for raw_fs in raw.filesets {
            let library = raw_fs.library.filter(|l| !l.is_empty()).map(Library::new);
            if let Some(ref lib) = library {
                design.add_library(lib.clone());
            }

            let mut fileset = FileSet::new(raw_fs.name, library);
            for path in glob_files(root, &raw_fs.files)? {
                match FileKind::from_path(&path) {
                    Some(kind) => fileset = fileset.with_file(path, kind),
                    None => tracing::debug!(
                        "ignoring `{}` in fileset `{}`: unknown source type",
                        path.display(),
                        fileset.name()
                    ),
                }
            }
            filesets.push(fileset);
        }

        for (name, path) in raw.external_libraries {
            let path = if path.is_absolute() { path } else { root.join(path) };
            design.add_external_library(Library::external(name, path));
        }

        Ok(Project {
            name: raw.project.name,
            toplevel: raw.project.toplevel,
            defines: raw.defines,
            generics: raw.generics,
            parameters: raw.parameters,
            plusargs: raw.plusargs,
            hooks: raw.hooks,
            filesets,
            design,
            cocotb: raw.cocotb,
        })
    }

    /// All VHDL sources across filesets, in declaration order.
    pub fn vhdl_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.filesets
            .iter()
            .flat_map(|fs| fs.files_of(FileKind::Vhdl))
    }
}

/// Generate a starter manifest.
pub fn generate_manifest(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
toplevel = "tb_{name}"

[[filesets]]
name = "rtl"
library = "{name}_lib"
files = ["rtl/**/*.vhd", "rtl/**/*.sv"]

[[filesets]]
name = "tb"
library = "work"
files = ["tb/**/*.sv"]

[defines]

[generics]

[parameters]

[plusargs]

[hooks]
pre = []
post = []
"#,
        name = name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_parse_full_manifest() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "rtl/uart.vhd", "");
        write(tmp.path(), "rtl/fifo.sv", "");
        write(tmp.path(), "rtl/notes.txt", "");

        let project = Project::parse(
            r#"
[project]
name = "uart"
toplevel = "tb_uart"

[defines]
WIDTH = 8
SIM = true

[generics]
G_DEPTH = 16

[parameters]
P_MODE = "fast"

[plusargs]
UVM_TESTNAME = "smoke"

[hooks]
pre = ["echo A", "echo B"]

[[filesets]]
name = "rtl"
library = "uart_lib"
files = ["rtl/*"]

[external-libraries]
unisim = "/opt/xilinx/unisim"
"#,
            tmp.path(),
        )
        .unwrap();

        assert_eq!(project.name, "uart");
        assert_eq!(project.toplevel.as_deref(), Some("tb_uart"));
        assert_eq!(project.defines["WIDTH"].to_string(), "8");
        assert_eq!(project.defines["SIM"].to_string(), "true");
        assert_eq!(project.generics["G_DEPTH"], ScalarValue::Integer(16));
        assert_eq!(project.parameters["P_MODE"].to_string(), "fast");
        assert_eq!(project.hooks.get("pre"), ["echo A", "echo B"]);

        let rtl = &project.filesets[0];
        assert_eq!(rtl.vhdl_library().unwrap().name(), "uart_lib");
        assert_eq!(rtl.files().len(), 2);
        assert_eq!(rtl.files_of(FileKind::Vhdl).count(), 1);
        assert_eq!(rtl.files_of(FileKind::SystemVerilog).count(), 1);

        assert!(project.design.vhdl_libraries().contains_key("uart_lib"));
        let unisim = &project.design.external_vhdl_libraries()["unisim"];
        assert_eq!(unisim.path(), Some(Path::new("/opt/xilinx/unisim")));
    }

    #[test]
    fn test_fileset_without_library() {
        let tmp = TempDir::new().unwrap();
        let project = Project::parse(
            r#"
[project]
name = "bare"

[[filesets]]
name = "default"
"#,
            tmp.path(),
        )
        .unwrap();

        assert!(project.filesets[0].vhdl_library().is_none());
        assert!(project.design.vhdl_libraries().is_empty());
        assert!(project.hooks.is_empty());
    }

    #[test]
    fn test_missing_hook_is_empty() {
        let mut hooks = HookSet::new();
        hooks.add("pre", "echo hi");

        assert_eq!(hooks.get("pre").len(), 1);
        assert!(hooks.get("post").is_empty());
    }

    #[test]
    fn test_scalar_values_render_verbatim() {
        let tmp = TempDir::new().unwrap();
        let project = Project::parse(
            "[project]\nname = \"x\"\n[generics]\nRATIO = 1.0\nGAIN = 0.25\nDEPTH = 16\nEN = true\nMODE = \"fast\"\n",
            tmp.path(),
        )
        .unwrap();

        let rendered: Vec<String> = project
            .generics
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        assert_eq!(
            rendered,
            ["DEPTH=16", "EN=true", "GAIN=0.25", "MODE=fast", "RATIO=1.0"]
        );
    }

    #[test]
    fn test_unknown_section_rejected() {
        let tmp = TempDir::new().unwrap();
        let result = Project::parse("[project]\nname = \"x\"\n[bogus]\n", tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path(Path::new("a.v")), Some(FileKind::Verilog));
        assert_eq!(FileKind::from_path(Path::new("a.SV")), Some(FileKind::SystemVerilog));
        assert_eq!(FileKind::from_path(Path::new("a.vhdl")), Some(FileKind::Vhdl));
        assert_eq!(FileKind::from_path(Path::new("a.c")), None);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_generated_manifest_parses() {
        let tmp = TempDir::new().unwrap();
        let project = Project::parse(&generate_manifest("blinky"), tmp.path()).unwrap();
        assert_eq!(project.name, "blinky");
        assert_eq!(project.filesets.len(), 2);
    }
}
