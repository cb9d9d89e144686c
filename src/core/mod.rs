//! Core data structures for HdlFlow.
//!
//! - The project description loaded from `HdlFlow.toml`
//! - Workspace management (manifest lookup, build directories)

pub mod project;
pub mod workspace;

pub use project::{
    Design, FileKind, FileSet, HookSet, Library, Project, ScalarValue, SourceFile, ValueMap,
    MANIFEST_NAME,
};
pub use workspace::{find_manifest, ManifestError, Workspace};
