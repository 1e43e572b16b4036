//! Sandboxed package probing.
//!
//! `Introspector::probe` loads a candidate package just long enough to read
//! its declared export list and docstring presence, then fully reverts the
//! import environment. Results are cached per normalized location for the
//! lifetime of one discovery run, so each location is loaded at most once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::env::{ImportEnvironment, Introspectable, SandboxGuard};
use super::error::ProbeError;
use crate::discover::filter::{normalize_path, MARKER_FILE};

//─────────────────────────────────────────────────────────────────────────────

/// Outcome of introspecting one package location. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProbe {
    /// The declared export list, `None` when no list was found.
    pub export_list: Option<Vec<String>>,
    /// Whether a non-empty documentation string is attached.
    pub has_doc: bool,
}

impl ExportProbe {
    /// The probe result for a package that could not be loaded.
    pub fn unknown() -> Self {
        Self {
            export_list: None,
            has_doc: false,
        }
    }

    /// True when the package itself claims documentable surface: a non-empty
    /// export list or a genuine docstring.
    pub fn has_surface(&self) -> bool {
        self.export_list.as_ref().is_some_and(|list| !list.is_empty()) || self.has_doc
    }

    /// True when a subpackage is worth descending into: no declared export
    /// list (filesystem judgment applies), a non-empty one, or a docstring.
    pub fn worth_documenting(&self) -> bool {
        self.export_list.as_ref().map_or(true, |list| !list.is_empty()) || self.has_doc
    }
}

/// What to do when a package cannot be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure and fall back to filesystem-only inclusion.
    #[default]
    BestEffort,
    /// Abort the whole run on the first probe failure.
    Strict,
}

/// Receives recoverable probe failures so they stay visible without aborting
/// discovery.
pub trait DiagnosticsSink {
    fn probe_failed(&mut self, location: &Path, error: &ProbeError);
}

/// A sink that discards diagnostics.
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn probe_failed(&mut self, _location: &Path, _error: &ProbeError) {}
}

//─────────────────────────────────────────────────────────────────────────────

/// Sandboxed loader for package locations.
pub struct Introspector {
    env: ImportEnvironment,
    cache: HashMap<PathBuf, ExportProbe>,
    search_root: Option<PathBuf>,
    policy: FailurePolicy,
}

impl Introspector {
    /// Creates an introspector whose ancestor climb is bounded by
    /// `search_root` (when given) and whose failures follow `policy`.
    pub fn new(search_root: Option<PathBuf>, policy: FailurePolicy) -> Self {
        Self {
            env: ImportEnvironment::new(),
            cache: HashMap::new(),
            search_root: search_root.map(|root| normalize_path(&root)),
            policy,
        }
    }

    /// The import environment the probes run against. After any probe has
    /// returned, its state is identical to before the probe.
    pub fn environment(&self) -> &ImportEnvironment {
        &self.env
    }

    /// Probes the package at `location`, loading it at most once per
    /// normalized location per run.
    ///
    /// # Errors
    /// Under `FailurePolicy::Strict` a failed load is returned as an error.
    /// Under `FailurePolicy::BestEffort` it is reported to `sink` and an
    /// unknown probe is returned instead, so callers can fall back to pure
    /// filesystem-based inclusion for that node.
    pub fn probe(
        &mut self,
        location: &Path,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<ExportProbe, ProbeError> {
        let key = normalize_path(location);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }
        let probe = match self.probe_uncached(&key) {
            Ok(probe) => probe,
            Err(error) => match self.policy {
                FailurePolicy::Strict => return Err(error),
                FailurePolicy::BestEffort => {
                    sink.probe_failed(&key, &error);
                    ExportProbe::unknown()
                }
            },
        };
        self.cache.insert(key, probe.clone());
        Ok(probe)
    }

    fn probe_uncached(&mut self, location: &Path) -> Result<ExportProbe, ProbeError> {
        let (base, dotted) = self.importable_name(location);
        let mut sandbox = SandboxGuard::new(&mut self.env);
        sandbox.extend_search_path(base);
        let module = sandbox.import(&dotted)?;
        Ok(ExportProbe {
            export_list: module.declared_exports(),
            has_doc: module.has_documentation(),
        })
        // sandbox drops here, restoring search path and module registry
    }

    /// Determines the true top-level importable name for `location` by
    /// climbing ancestors while each still carries the package marker,
    /// stopping at the first that does not or at the configured search root.
    /// Returns the directory to put on the search path and the full dotted
    /// name, so a nested package is addressed by its whole dotted path.
    fn importable_name(&self, location: &Path) -> (PathBuf, String) {
        let mut anchor = location.to_path_buf();
        let mut segments = vec![segment_name(&anchor)];
        loop {
            if self.search_root.as_deref() == Some(anchor.as_path()) {
                break;
            }
            let Some(parent) = anchor.parent() else { break };
            if !parent.join(MARKER_FILE).is_file() {
                break;
            }
            anchor = parent.to_path_buf();
            segments.push(segment_name(&anchor));
        }
        segments.reverse();
        let base = anchor
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| anchor.clone());
        (base, segments.join("."))
    }
}

fn segment_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

//─────────────────────────────────────────────────────────────────────────────
