// environment module
mod env;
// error module
mod error;
// probe module
mod probe;

//─────────────────────────────────────────────────────────────────────────────
// Public re-exports from the introspection modules.
//─────────────────────────────────────────────────────────────────────────────
pub use env::{ImportEnvironment, Introspectable, ParsedModule, SandboxGuard};
pub use error::ProbeError;
pub use probe::{DiagnosticsSink, ExportProbe, FailurePolicy, Introspector, NullSink};
