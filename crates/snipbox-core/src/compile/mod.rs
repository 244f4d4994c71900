//! Compilation pipeline for snipbox.
//!
//! This module provides:
//! - Toolchain discovery (locating `rustc`)
//! - The `CompilerBackend` seam and its `rustc` implementation
//! - Diagnostic parsing and classification (rustc JSON → `Diagnostic`)
//! - The `Compiler` orchestrator producing a `CompilationOutcome`
//!
//! # Architecture
//!
//! ```text
//! SourceUnit ──► Compiler ──► CompilerBackend (rustc --error-format=json)
//!                   │               │
//!                   │               └──► artifact bytes + raw diagnostics
//!                   │
//!                   └──► surfaced + escaped diagnostics ──► CompilationOutcome
//! ```

mod backend;
mod compiler;
mod diagnostics;
mod toolchain;
mod types;

pub use backend::{BuildOutput, BuildRequest, CompilerBackend, CrateKind, RustcBackend};
pub use compiler::Compiler;
pub use diagnostics::{Diagnostic, Severity, escape_markup, parse_rustc_output};
pub use toolchain::ToolchainManager;
pub use types::{Artifact, CompilationOutcome, CompilerConfig, ExternCrate, LinkSet};
