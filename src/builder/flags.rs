//! Tool argument assembly.
//!
//! Computed flags are collected as typed [`Flag`] tokens in a [`FlagSet`],
//! so a flag produced more than once collapses into a single token. The
//! set is rendered to text at the boundary and the user's raw extra flags
//! for the tool are appended last, verbatim.

use std::collections::BTreeSet;
use std::fmt;

use crate::builder::options::RunOptions;
use crate::core::{FileKind, FileSet, Project};

/// One computed tool flag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// `-quiet`
    Quiet,
    /// `-dbg`
    Debug,
    /// `-dbg +access +r`
    DebugAccess,
    /// `+define+NAME=VALUE`
    Define { name: String, value: String },
    /// `-L NAME`
    Library(String),
    /// `-timescale VALUE`
    Timescale(String),
    /// `-gNAME=VALUE`
    Generic { name: String, value: String },
    /// `+NAME=VALUE`
    PlusArg { name: String, value: String },
    /// `-sv_seed N`
    SvSeed(u64),
    /// `-random_seed 0|1`
    RandomSeed(bool),
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Quiet => f.write_str("-quiet"),
            Flag::Debug => f.write_str("-dbg"),
            Flag::DebugAccess => f.write_str("-dbg +access +r"),
            Flag::Define { name, value } => write!(f, "+define+{}={}", name, value),
            Flag::Library(name) => write!(f, "-L {}", name),
            Flag::Timescale(value) => write!(f, "-timescale {}", value),
            Flag::Generic { name, value } => write!(f, "-g{}={}", name, value),
            Flag::PlusArg { name, value } => write!(f, "+{}={}", name, value),
            Flag::SvSeed(seed) => write!(f, "-sv_seed {}", seed),
            Flag::RandomSeed(enabled) => write!(f, "-random_seed {}", u8::from(*enabled)),
        }
    }
}

/// A de-duplicated, deterministically ordered set of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet(BTreeSet<Flag>);

impl FlagSet {
    pub fn new() -> Self {
        FlagSet(BTreeSet::new())
    }

    /// Add a flag. Returns `false` if it was already present.
    pub fn insert(&mut self, flag: Flag) -> bool {
        self.0.insert(flag)
    }

    /// Render the set, followed by `extra` when it is not blank.
    pub fn render(&self, extra: &str) -> String {
        let mut parts: Vec<String> = self.0.iter().map(Flag::to_string).collect();
        let extra = extra.trim();
        if !extra.is_empty() {
            parts.push(extra.to_string());
        }
        parts.join(" ")
    }
}

impl Extend<Flag> for FlagSet {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Name of the library a fileset compiles into, or `""` when it has none.
pub fn get_library(fileset: &FileSet) -> &str {
    fileset.vhdl_library().map(|lib| lib.name()).unwrap_or("")
}

/// Builds the argument strings of every Riviera PRO tool for one run.
#[derive(Debug, Clone, Copy)]
pub struct FlagAssembler<'a> {
    project: &'a Project,
    options: &'a RunOptions,
}

impl<'a> FlagAssembler<'a> {
    pub fn new(project: &'a Project, options: &'a RunOptions) -> Self {
        FlagAssembler { project, options }
    }

    /// Per-fileset compile flags for one source language.
    ///
    /// The order of these tokens is fixed. `-work` is left out when the
    /// fileset has no library.
    pub fn fileset(&self, fileset: &FileSet, kind: FileKind) -> String {
        let mut parts = match kind {
            FileKind::Verilog => vec![],
            FileKind::SystemVerilog => vec!["-sv2k17".to_string()],
            FileKind::Vhdl => vec!["-2008".to_string()],
        };
        let library = get_library(fileset);
        if !library.is_empty() {
            parts.push(format!("-work {}", library));
        }
        parts.join(" ")
    }

    /// Verilog and SystemVerilog compiler flags.
    pub fn vlog(&self) -> String {
        let mut flags = self.compile_common();
        flags.extend(self.project.defines.iter().map(|(name, value)| Flag::Define {
            name: name.clone(),
            value: value.to_string(),
        }));
        flags.render(&self.options.extra_flags.vlog)
    }

    /// VHDL compiler flags.
    pub fn vcom(&self) -> String {
        self.compile_common()
            .render(&self.options.extra_flags.vcom)
    }

    /// Library mapping flags.
    pub fn vmap(&self) -> String {
        FlagSet::new().render(&self.options.extra_flags.vmap)
    }

    /// Optimizer flags.
    pub fn vopt(&self) -> String {
        FlagSet::new().render(&self.options.extra_flags.vopt)
    }

    /// Simulator flags.
    pub fn vsim(&self) -> String {
        let opts = self.options;
        let project = self.project;
        let mut flags = FlagSet::new();

        if opts.verbose == 0 {
            flags.insert(Flag::Quiet);
        }

        let design = &project.design;
        flags.extend(
            design
                .vhdl_libraries()
                .keys()
                .chain(design.external_vhdl_libraries().keys())
                .map(|name| Flag::Library(name.clone())),
        );

        if let Some(timescale) = opts.timescale.as_deref().filter(|t| !t.is_empty()) {
            flags.insert(Flag::Timescale(timescale.to_string()));
        }

        // Generics and parameters share the simulator's override syntax.
        flags.extend(
            project
                .generics
                .iter()
                .chain(project.parameters.iter())
                .map(|(name, value)| Flag::Generic {
                    name: name.clone(),
                    value: value.to_string(),
                }),
        );
        flags.extend(project.plusargs.iter().map(|(name, value)| Flag::PlusArg {
            name: name.clone(),
            value: value.to_string(),
        }));

        if opts.gui || project.cocotb.enabled {
            flags.insert(Flag::DebugAccess);
        }
        flags.insert(Flag::SvSeed(opts.seed));
        flags.insert(Flag::RandomSeed(opts.random_seed));

        flags.render(&opts.extra_flags.vsim)
    }

    fn compile_common(&self) -> FlagSet {
        let mut flags = FlagSet::new();
        if self.options.verbose == 0 {
            flags.insert(Flag::Quiet);
        }
        if self.options.gui {
            flags.insert(Flag::Debug);
        }
        flags
    }
}
