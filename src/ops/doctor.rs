//! Environment and toolchain health checks.
//!
//! The `doctor` command verifies that the simulator, the build tool and the
//! optional helpers resolve on the search path, without running a flow.
//!
//! ## Checks Performed
//!
//! - Riviera PRO tools (vlog, vsim, vcom, vlib, vmap)
//! - `vdir` shadowing by an unrelated system binary
//! - make
//! - vsg and cocotb-config (optional)

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::builder::env::EnvContext;
use crate::builder::verify::{CANARY, REQUIRED_TOOLS};
use crate::util::process::ProcessBuilder;

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..CheckResult::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: BTreeMap<String, String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        DoctorReport::default()
    }

    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }

    /// Look up a check by name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Run every check against `env`.
pub fn doctor(env: &EnvContext) -> DoctorReport {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());

    for tool in REQUIRED_TOOLS {
        report.add(check_tool(env, tool, "Riviera PRO tool", false));
    }
    report.add(check_canary(env));
    report.add(check_tool(env, "make", "runs the generated build scripts", true));
    report.add(
        check_tool(env, "vsg", "needed by `hdlflow vhdl-style-guide`", true).optional(),
    );
    report.add(
        check_tool(env, "cocotb-config", "needed when [cocotb] is enabled", true).optional(),
    );

    report.total_duration = start.elapsed();
    report
}

fn check_tool(env: &EnvContext, tool: &str, purpose: &str, probe_version: bool) -> CheckResult {
    let start = Instant::now();

    match env.which(tool) {
        Some(path) => {
            let version = if probe_version {
                tool_version(&path)
            } else {
                None
            };
            CheckResult::pass(tool, format!("Found {} ({})", tool, purpose))
                .with_version(version)
                .with_path(path)
                .with_duration(start.elapsed())
        }
        None => CheckResult::fail(tool, format!("{} not found on PATH ({})", tool, purpose))
            .with_duration(start.elapsed()),
    }
}

/// The canary must live next to `vsim`; elsewhere it is shadowed.
fn check_canary(env: &EnvContext) -> CheckResult {
    let start = Instant::now();
    let name = format!("{} shadowing", CANARY);

    let (Some(vsim), Some(canary)) = (env.which("vsim"), env.which(CANARY)) else {
        return CheckResult::fail(name, format!("cannot compare `{}` with `vsim`", CANARY))
            .with_duration(start.elapsed())
            .optional();
    };

    let result = if canary.parent() == vsim.parent() {
        CheckResult::pass(name, format!("`{}` belongs to the Riviera PRO install", CANARY))
    } else {
        CheckResult::fail(
            name,
            format!(
                "`{}` resolves to {}, outside the Riviera PRO install; \
                 runs will prepend {} to PATH",
                CANARY,
                canary.display(),
                vsim.parent().unwrap_or(Path::new("")).display()
            ),
        )
        .optional()
    };
    result.with_path(canary).with_duration(start.elapsed())
}

/// First non-empty line of `<tool> --version`.
fn tool_version(path: &Path) -> Option<String> {
    let output = ProcessBuilder::new(path).arg("--version").exec().ok()?;
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "hdlflow doctor");
    let _ = writeln!(output, "==============\n");

    if verbose {
        let unknown = "unknown".to_string();
        let _ = writeln!(output, "Environment:");
        let _ = writeln!(
            output,
            "  OS: {} ({})\n",
            report.environment.get("os").unwrap_or(&unknown),
            report.environment.get("arch").unwrap_or(&unknown)
        );
    }

    let _ = writeln!(output, "Checks:");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };
        let _ = writeln!(output, "  {} {}{}", status, check.name, required);

        if verbose || !check.passed {
            let _ = writeln!(output, "      {}", check.message);
        }
        if verbose {
            if let Some(path) = &check.path {
                let _ = writeln!(output, "      Path: {}", path.display());
            }
            if let Some(version) = &check.version {
                let _ = writeln!(output, "      Version: {}", version);
            }
        }
    }

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    let _ = writeln!(output, "\nSummary: {} passed, {} failed", passed, failed);

    if required_failed > 0 {
        let _ = writeln!(
            output,
            "\n{} required check(s) failed. Flows will not run.",
            required_failed
        );
    } else if failed > 0 {
        let _ = writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        );
    } else {
        let _ = writeln!(output, "\nAll checks passed.");
    }

    output
}
