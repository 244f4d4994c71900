//! Core engine for snipbox: compile untrusted Rust snippets and run them in
//! a sandbox.
//!
//! This crate provides:
//! - Source units with a pinned edition and entry-point detection
//! - Compilation orchestration over `rustc` with diagnostic classification
//! - Isolated, killable execution of compiled artifacts with output capture
//! - Markup reports for the message sink
//! - The `Runner`, the fail-soft boundary tying it all together
//!
//! # Architecture
//!
//! ```text
//! source text ──► SourceUnit ──► Compiler ──► Artifact ──► SandboxExecutor ──► ExecutionOutcome
//!                                   │                            │
//!                                   └──► Vec<Diagnostic>         └──► IsolationUnit (one per run)
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod execute;
pub mod report;
pub mod runner;
pub mod source;

pub use compile::{
    Artifact, CompilationOutcome, Compiler, CompilerBackend, CompilerConfig, Diagnostic,
    LinkSet, RustcBackend, Severity, ToolchainManager,
};
pub use config::SnipboxConfig;
pub use error::{Error, Result};
pub use execute::{ExecutionOutcome, ExecutorConfig, IsolationUnit, SandboxExecutor};
pub use runner::{Reply, RunOutcome, Runner};
pub use source::{Edition, EntryPoint, SourceUnit};
