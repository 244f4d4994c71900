//! The compiler orchestrator: source unit in, classified outcome out.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::source::{EntryPoint, SourceUnit};

use super::backend::{BuildOutput, BuildRequest, CompilerBackend, CrateKind, RustcBackend};
use super::diagnostics::{Diagnostic, escape_markup};
use super::types::{Artifact, CompilationOutcome, CompilerConfig};

/// Drives a compiler backend and classifies what it reports.
///
/// Never executes generated code and never mutates its inputs.
#[derive(Clone)]
pub struct Compiler {
    backend: Arc<dyn CompilerBackend>,
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(backend: Arc<dyn CompilerBackend>, config: CompilerConfig) -> Self {
        Self { backend, config }
    }

    /// Compiler backed by rustc, located according to `config`.
    pub fn rustc(config: CompilerConfig) -> Result<Self> {
        let backend = RustcBackend::from_config(&config)?;
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Wrap user text in a source unit using the pinned edition.
    pub fn source_unit(&self, text: impl Into<String>) -> SourceUnit {
        SourceUnit::new(text, self.config.edition)
    }

    /// Compile a source unit.
    ///
    /// Every snippet is first built as a binary, so rustc decides whether
    /// there is an entry point. Only when the sole complaint is a missing
    /// `main` is it rebuilt as a library with no entry point.
    ///
    /// `Ok(Failure)` is a problem with the user's code; `Err` is a problem
    /// with the compiler service.
    pub fn compile(&self, source: &SourceUnit) -> Result<CompilationOutcome> {
        let start = Instant::now();
        let shape = source.entry_point().unwrap_or(EntryPoint::Plain);

        let (output, failures) = self.build(source, CrateKind::Bin)?;
        let (crate_kind, entry_point, output, failures) = if is_missing_main(&failures) {
            tracing::debug!("No entry point, rebuilding as a library");
            let (output, failures) = self.build(source, CrateKind::Lib)?;
            (CrateKind::Lib, None, output, failures)
        } else {
            (CrateKind::Bin, Some(shape), output, failures)
        };

        let compile_time = start.elapsed().as_millis();

        if !failures.is_empty() {
            tracing::debug!(
                "Compilation failed with {} diagnostics in {}ms",
                failures.len(),
                compile_time
            );
            return Ok(CompilationOutcome::Failure(failures));
        }

        match output.artifact {
            Some(bytes) if !bytes.is_empty() => {
                tracing::debug!(
                    "Compiled {} bytes ({:?}) in {}ms",
                    bytes.len(),
                    crate_kind,
                    compile_time
                );
                Ok(CompilationOutcome::Success(Artifact::new(bytes, entry_point)))
            }
            Some(_) => Err(Error::Toolchain(
                "compiler produced an empty artifact".to_string(),
            )),
            None => Err(Error::Toolchain(
                "compiler failed without reporting any errors".to_string(),
            )),
        }
    }

    /// Run one build and keep the surfaced diagnostics, escaped.
    fn build(
        &self,
        source: &SourceUnit,
        crate_kind: CrateKind,
    ) -> Result<(BuildOutput, Vec<Diagnostic>)> {
        let mut output = self.backend.build(&BuildRequest {
            source,
            crate_kind,
            config: &self.config,
        })?;

        let failures = std::mem::take(&mut output.diagnostics)
            .into_iter()
            .filter(Diagnostic::is_surfaced)
            .map(|diagnostic| Diagnostic {
                message: escape_markup(&diagnostic.message),
                ..diagnostic
            })
            .collect();

        Ok((output, failures))
    }
}

/// rustc's "`main` function not found in crate".
const MISSING_MAIN: &str = "E0601";

fn is_missing_main(failures: &[Diagnostic]) -> bool {
    !failures.is_empty() && failures.iter().all(|d| d.id == MISSING_MAIN)
}
