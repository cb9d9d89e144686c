//! Build-script generation for the Riviera PRO flow.
//!
//! Three files land in the build directory: `project.mk` with the assembled
//! tool flags, a `Makefile` with the `compile`, `elaborate`, `simulate` and
//! `gui` targets the stage executor invokes, and `cocotb.mk` when the
//! co-simulation adapter is enabled.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::flags::FlagAssembler;
use crate::builder::options::RunOptions;
use crate::core::{FileKind, Project};
use crate::util::fs::write_string;

pub const MAKEFILE: &str = "Makefile";
pub const PROJECT_MK: &str = "project.mk";
pub const COCOTB_MK: &str = "cocotb.mk";

const HEADER: &str = "# Generated by hdlflow. Changes are overwritten on the next run.\n";

/// Do-command used when the user supplies none.
fn default_do_command(wave: bool) -> &'static str {
    if wave {
        r#"-do "log -rec /*; run -all; endsim; quit -force""#
    } else {
        r#"-do "run -all; endsim; quit -force""#
    }
}

/// Escape text written into a make file.
///
/// `$` would start a variable reference and `#` a comment that silently
/// drops the rest of the line. Both forms also survive recipe lines.
fn make_escape(value: &str) -> String {
    value.replace('$', "$$").replace('#', "\\#")
}

fn escaped_path(path: &Path) -> String {
    make_escape(&path.display().to_string())
}

/// Render `project.mk`.
pub fn render_project_mk(project: &Project, options: &RunOptions) -> String {
    let flags = FlagAssembler::new(project, options);
    let toplevel = project.toplevel.as_deref().unwrap_or_default();

    let mut out = String::from(HEADER);
    let vars = [
        ("TOPLEVEL", toplevel.to_string()),
        ("VLOG_FLAGS", flags.vlog()),
        ("VCOM_FLAGS", flags.vcom()),
        ("VMAP_FLAGS", flags.vmap()),
        ("VOPT_FLAGS", flags.vopt()),
        ("VSIM_FLAGS", flags.vsim()),
    ];
    for (name, value) in vars {
        let _ = writeln!(out, "{} := {}", name, make_escape(&value));
    }
    let _ = writeln!(out, "DO_CMD ?= {}", default_do_command(options.wave));
    out
}

/// Render the `Makefile`.
pub fn render_makefile(project: &Project, options: &RunOptions) -> String {
    let flags = FlagAssembler::new(project, options);
    let design = &project.design;

    let mut out = String::from(HEADER);
    let _ = writeln!(out, "include {}", PROJECT_MK);
    if project.cocotb.enabled {
        let _ = writeln!(out, "include {}", COCOTB_MK);
    }
    out.push('\n');
    out.push_str(".PHONY: compile elaborate simulate gui clean\n\n");

    out.push_str("compile:\n");
    for name in design.vhdl_libraries().keys() {
        let _ = writeln!(out, "\tvlib {}", make_escape(name));
    }
    for (name, library) in design.external_vhdl_libraries() {
        let path = library.path().map(escaped_path).unwrap_or_default();
        let _ = writeln!(out, "\tvmap $(VMAP_FLAGS) {} {}", make_escape(name), path);
    }
    for fileset in &project.filesets {
        for file in fileset.files() {
            let tool = match file.kind {
                FileKind::Vhdl => "vcom $(VCOM_FLAGS)",
                FileKind::Verilog | FileKind::SystemVerilog => "vlog $(VLOG_FLAGS)",
            };
            let fileset_flags = make_escape(&flags.fileset(fileset, file.kind));
            let mut line = format!("\t{}", tool);
            if !fileset_flags.is_empty() {
                line.push(' ');
                line.push_str(&fileset_flags);
            }
            let _ = writeln!(out, "{} {}", line, escaped_path(&file.path));
        }
    }

    out.push_str("\nelaborate:\n");
    out.push_str("\tvsim -c $(VSIM_FLAGS) $(VOPT_FLAGS) -do \"quit -force\" $(TOPLEVEL)\n");

    out.push_str("\nsimulate:\n");
    out.push_str("\tvsim -c $(VSIM_FLAGS) $(DO_CMD) $(TOPLEVEL)\n");

    out.push_str("\ngui:\n");
    out.push_str("\tvsim $(VSIM_FLAGS) $(DO_CMD) $(TOPLEVEL)\n");

    out.push_str("\nclean:\n");
    let libs: Vec<String> = design.vhdl_libraries().keys().map(|l| make_escape(l)).collect();
    let _ = writeln!(out, "\trm -rf {} dataset.asdb library.cfg", libs.join(" "));

    out
}

/// Language of the simulation toplevel for the co-simulation adapter.
fn toplevel_lang(project: &Project) -> &str {
    if let Some(lang) = project.cocotb.toplevel_lang.as_deref() {
        return lang;
    }
    let has_verilog = project
        .filesets
        .iter()
        .flat_map(|fs| fs.files())
        .any(|f| f.kind.is_verilog_family());
    if has_verilog {
        "verilog"
    } else {
        "vhdl"
    }
}

/// Render `cocotb.mk`.
pub fn render_cocotb_mk(project: &Project) -> String {
    let mut out = String::from(HEADER);
    let module = project.cocotb.module.as_deref().unwrap_or_default();
    let _ = writeln!(out, "export MODULE := {}", make_escape(module));
    out.push_str("export TOPLEVEL := $(TOPLEVEL)\n");
    let _ = writeln!(
        out,
        "export TOPLEVEL_LANG := {}",
        make_escape(toplevel_lang(project))
    );
    out.push_str("COCOTB_VPI := $(shell cocotb-config --lib-name-path vpi riviera)\n");
    out.push_str("VSIM_FLAGS += -pli $(COCOTB_VPI)\n");
    out
}

/// Write every build script into `build_dir`, returning the written paths.
pub fn write_scripts(
    project: &Project,
    options: &RunOptions,
    build_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(3);

    let mut emit = |name: &str, contents: String| -> Result<()> {
        let path = build_dir.join(name);
        tracing::debug!("writing {}", path.display());
        write_string(&path, &contents)?;
        written.push(path);
        Ok(())
    };

    emit(PROJECT_MK, render_project_mk(project, options))?;
    emit(MAKEFILE, render_makefile(project, options))?;
    if project.cocotb.enabled {
        emit(COCOTB_MK, render_cocotb_mk(project))?;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::options::ToolFlags;
    use crate::core::{FileSet, Library, ScalarValue};
    use crate::test_support::ProjectFixture;
    use tempfile::TempDir;

    fn uart(tmp: &TempDir) -> Project {
        let manifest = ProjectFixture::uart().write_to(tmp.path()).unwrap();
        Project::load(&manifest).unwrap()
    }

    #[test]
    fn test_project_mk_variables() {
        let tmp = TempDir::new().unwrap();
        let project = uart(&tmp);
        let opts = RunOptions {
            extra_flags: ToolFlags {
                vsim: "-acdb".into(),
                ..ToolFlags::default()
            },
            ..RunOptions::default()
        };

        let mk = render_project_mk(&project, &opts);
        assert!(mk.contains("TOPLEVEL := tb_uart\n"));
        assert!(mk.contains("VLOG_FLAGS := -quiet +define+WIDTH=8\n"));
        assert!(mk.contains("VCOM_FLAGS := -quiet\n"));
        assert!(mk.contains("VMAP_FLAGS := \n"));
        assert!(mk.contains("-L uart_lib -L work"));
        assert!(mk.contains("-gG_BAUD=115200"));
        assert!(mk.contains("+UVM_TESTNAME=smoke"));
        assert!(mk.lines().any(|l| l.starts_with("VSIM_FLAGS := ") && l.ends_with(" -acdb")));
        assert!(mk.contains("DO_CMD ?= -do \"run -all; endsim; quit -force\"\n"));
    }

    #[test]
    fn test_wave_records_signals() {
        let project = Project::default();
        let opts = RunOptions {
            wave: true,
            ..RunOptions::default()
        };
        let mk = render_project_mk(&project, &opts);
        assert!(mk.contains("log -rec /*; run -all"));
    }

    #[test]
    fn test_makefile_compile_order() {
        let tmp = TempDir::new().unwrap();
        let mut project = uart(&tmp);
        project
            .design
            .add_external_library(Library::external("unisim", "/opt/xilinx/unisim"));
        let opts = RunOptions::default();

        let makefile = render_makefile(&project, &opts);
        let root = tmp.path();
        let compile: Vec<&str> = makefile
            .lines()
            .skip_while(|l| *l != "compile:")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();

        assert_eq!(
            compile,
            [
                "\tvlib uart_lib".to_string(),
                "\tvlib work".to_string(),
                "\tvmap $(VMAP_FLAGS) unisim /opt/xilinx/unisim".to_string(),
                format!(
                    "\tvcom $(VCOM_FLAGS) -2008 -work uart_lib {}",
                    root.join("rtl/uart_rx.vhd").display()
                ),
                format!(
                    "\tvcom $(VCOM_FLAGS) -2008 -work uart_lib {}",
                    root.join("rtl/uart_tx.vhd").display()
                ),
                format!(
                    "\tvlog $(VLOG_FLAGS) -work uart_lib {}",
                    root.join("rtl/baud.v").display()
                ),
                format!(
                    "\tvlog $(VLOG_FLAGS) -sv2k17 -work work {}",
                    root.join("tb/tb_uart.sv").display()
                ),
            ]
        );
        for target in ["elaborate:", "simulate:", "gui:", "clean:"] {
            assert!(makefile.lines().any(|l| l == target), "missing {}", target);
        }
        assert!(!makefile.contains(COCOTB_MK));
    }

    #[test]
    fn test_write_scripts_with_cocotb() {
        let tmp = TempDir::new().unwrap();
        let mut project = uart(&tmp);
        project.cocotb.enabled = true;
        project.cocotb.module = Some("test_uart".into());
        let build = tmp.path().join(".hdlflow/build/rivierapro");

        let written = write_scripts(&project, &RunOptions::default(), &build).unwrap();
        assert_eq!(written.len(), 3);
        assert!(build.join(MAKEFILE).is_file());
        assert!(build.join(PROJECT_MK).is_file());

        let cocotb = std::fs::read_to_string(build.join(COCOTB_MK)).unwrap();
        assert!(cocotb.contains("export MODULE := test_uart"));
        assert!(cocotb.contains("export TOPLEVEL_LANG := verilog"));

        let makefile = std::fs::read_to_string(build.join(MAKEFILE)).unwrap();
        assert!(makefile.contains("include cocotb.mk"));
        let mk = std::fs::read_to_string(build.join(PROJECT_MK)).unwrap();
        assert!(mk.contains("-dbg +access +r"));
    }

    #[test]
    fn test_dollar_escaped() {
        let project = Project::default();
        let opts = RunOptions {
            extra_flags: ToolFlags {
                vcom: "-work $LIB".into(),
                ..ToolFlags::default()
            },
            ..RunOptions::default()
        };
        assert!(render_project_mk(&project, &opts).contains("VCOM_FLAGS := -quiet -work $$LIB\n"));
    }

    #[test]
    fn test_hash_escaped_in_flags_and_paths() {
        let mut project = Project::default();
        project
            .defines
            .insert("DLY".into(), ScalarValue::from("#1"));
        project.filesets.push(
            FileSet::new("rtl", Some(Library::new("lib"))).with_file("/src/#old/a.vhd", FileKind::Vhdl),
        );
        let opts = RunOptions::default();

        let mk = render_project_mk(&project, &opts);
        assert!(mk.contains("VLOG_FLAGS := -quiet +define+DLY=\\#1\n"));

        let makefile = render_makefile(&project, &opts);
        assert!(makefile.contains("\tvcom $(VCOM_FLAGS) -2008 -work lib /src/\\#old/a.vhd\n"));
    }

    /// Let `make` itself read `project.mk` and report what a tool would get.
    #[cfg(unix)]
    fn make_sees(mk: &str, variable: &str) -> Option<String> {
        use crate::util::process::ProcessBuilder;

        let make = which::which("make").ok()?;
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(PROJECT_MK), mk).unwrap();
        std::fs::write(
            tmp.path().join("show.mk"),
            format!("include {}\n$(info $({}))\nshow: ;@:\n", PROJECT_MK, variable),
        )
        .unwrap();

        let output = ProcessBuilder::new(make)
            .args(["-s", "-f", "show.mk", "show"])
            .cwd(tmp.path())
            .exec()
            .unwrap();
        assert!(output.status.success());
        Some(String::from_utf8_lossy(&output.stdout).trim_end_matches('\n').to_string())
    }

    #[test]
    #[cfg(unix)]
    fn test_make_reads_flags_unchanged() {
        let mut project = Project::default();
        project
            .defines
            .insert("DLY".into(), ScalarValue::from("#1"));
        let opts = RunOptions {
            extra_flags: ToolFlags {
                vlog: "+incdir+$ROOT/inc -lint".into(),
                ..ToolFlags::default()
            },
            ..RunOptions::default()
        };
        let assembled = FlagAssembler::new(&project, &opts).vlog();
        assert_eq!(assembled, "-quiet +define+DLY=#1 +incdir+$ROOT/inc -lint");

        // Skip quietly on hosts without make.
        let Some(seen) = make_sees(&render_project_mk(&project, &opts), "VLOG_FLAGS") else {
            return;
        };
        assert_eq!(seen, assembled);
    }
}
