//! The compiler service seam.
//!
//! `Compiler` only orchestrates; turning text into bytes is delegated to a
//! `CompilerBackend`. Production uses `RustcBackend`.

use std::fs;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::source::SourceUnit;

use super::diagnostics::{Diagnostic, parse_rustc_output};
use super::toolchain::ToolchainManager;
use super::types::CompilerConfig;

/// Crate name given to every snippet.
const CRATE_NAME: &str = "snippet";

/// What kind of output the backend should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrateKind {
    /// Standalone executable
    Bin,
    /// Library; used for snippets without an entry point
    Lib,
}

impl CrateKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Lib => "lib",
        }
    }
}

/// One compile request handed to a backend.
#[derive(Debug)]
pub struct BuildRequest<'a> {
    pub source: &'a SourceUnit,
    pub crate_kind: CrateKind,
    pub config: &'a CompilerConfig,
}

/// Raw result of a backend run, before classification.
#[derive(Debug, Default)]
pub struct BuildOutput {
    /// Artifact bytes; `None` when the compiler produced nothing
    pub artifact: Option<Vec<u8>>,

    /// Every diagnostic the compiler emitted, in order
    pub diagnostics: Vec<Diagnostic>,
}

/// An external compiler service.
///
/// An `Err` means the service itself failed (missing toolchain, IO),
/// never that the user's code is wrong.
pub trait CompilerBackend: Send + Sync {
    fn build(&self, request: &BuildRequest<'_>) -> Result<BuildOutput>;
}

/// Compiles with `rustc`, reading diagnostics from its JSON output.
pub struct RustcBackend {
    toolchain: ToolchainManager,
}

impl RustcBackend {
    pub fn new(toolchain: ToolchainManager) -> Self {
        Self { toolchain }
    }

    /// Locate rustc according to the config.
    pub fn from_config(config: &CompilerConfig) -> Result<Self> {
        Ok(Self::new(ToolchainManager::with_rustc(
            config.rustc_path.as_deref(),
        )?))
    }

    pub fn toolchain(&self) -> &ToolchainManager {
        &self.toolchain
    }
}

impl CompilerBackend for RustcBackend {
    fn build(&self, request: &BuildRequest<'_>) -> Result<BuildOutput> {
        let build_dir = tempfile::Builder::new().prefix("snipbox-build-").tempdir()?;

        let src_file = build_dir.path().join("main.rs");
        fs::write(&src_file, request.source.text())?;

        let out_path = build_dir.path().join(match request.crate_kind {
            CrateKind::Bin => CRATE_NAME.to_string(),
            CrateKind::Lib => format!("lib{CRATE_NAME}.rlib"),
        });

        let config = request.config;
        let mut cmd = Command::new(self.toolchain.rustc_path());

        cmd.arg(&src_file)
            .arg(format!("--crate-name={CRATE_NAME}"))
            .arg(format!("--crate-type={}", request.crate_kind.as_str()))
            .arg(format!("--edition={}", request.source.edition()))
            .arg(format!("-Copt-level={}", config.opt_level))
            .arg("--error-format=json")
            .arg("-o")
            .arg(&out_path)
            .args(config.link_set.rustc_args());

        for lint in &config.deny_lints {
            cmd.arg("-D").arg(lint);
        }

        cmd.args(&config.extra_rustc_flags)
            .current_dir(build_dir.path())
            .stdin(Stdio::null());

        tracing::debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            Error::Toolchain(format!(
                "Failed to run {}: {}",
                self.toolchain.rustc_path().display(),
                e
            ))
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostics = parse_rustc_output(&stderr);

        let artifact = if output.status.success() {
            Some(fs::read(&out_path)?)
        } else {
            if diagnostics.is_empty() {
                tracing::warn!(
                    "rustc exited with {} without diagnostics: {}",
                    output.status,
                    stderr.trim()
                );
            }
            None
        };

        build_dir.close()?;

        Ok(BuildOutput {
            artifact,
            diagnostics,
        })
    }
}
