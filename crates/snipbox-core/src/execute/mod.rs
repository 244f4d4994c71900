//! Sandboxed execution of compiled snippets.
//!
//! Every execution gets its own `IsolationUnit`: a private directory holding
//! the artifact and a child process in its own process group with its own
//! output pipes. Output is injected per execution rather than redirected
//! globally, so concurrent executions never share a sink, and a timeout
//! kills the whole process group instead of abandoning it.

mod capture;
mod fault;
mod sandbox;
mod types;
mod unit;

pub use capture::{Captured, OutputCapture};
pub use fault::innermost_message;
pub use sandbox::SandboxExecutor;
pub use types::{DEFAULT_TIMEOUT_MS, ExecutionOutcome, ExecutorConfig};
pub use unit::IsolationUnit;
