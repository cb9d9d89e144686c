//! hdlflow - build orchestration for HDL simulation toolchains
//!
//! This crate turns a declarative `HdlFlow.toml` project into build scripts
//! and a staged sequence of simulator invocations, verifying the toolchain
//! environment and running lifecycle hooks along the way.

pub mod builder;
pub mod core;
pub mod flows;
pub mod ops;
pub mod util;

/// Test utilities for hdlflow unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a recording command runner and fake toolchain fixtures.
#[cfg(test)]
pub mod test_support;

pub use builder::{EnvContext, FlowError, RunOptions, Stage, StageExecutor};
pub use core::{Project, Workspace};
pub use flows::Flow;
pub use util::context::GlobalContext;
