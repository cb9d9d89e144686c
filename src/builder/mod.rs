//! Simulation flow engine.
//!
//! This module turns a project and a set of run options into tool flags,
//! build scripts and a staged sequence of external commands.

pub mod env;
pub mod errors;
pub mod flags;
pub mod hooks;
pub mod options;
pub mod runner;
pub mod script;
pub mod stage;
pub mod verify;

pub use env::EnvContext;
pub use errors::FlowError;
pub use flags::{Flag, FlagAssembler, FlagSet};
pub use hooks::HookRunner;
pub use options::{RunOptions, Stage, ToolFlags};
pub use runner::{CommandRunner, SystemRunner};
pub use stage::{StageExecutor, StageState};
pub use verify::verify_toolchain;
