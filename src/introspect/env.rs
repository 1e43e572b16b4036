//! The explicit import environment a probe runs against.
//!
//! The original tooling mutated interpreter-global state (`sys.path` and the
//! loaded-module registry) around each dynamic import. Here that state is an
//! owned [`ImportEnvironment`], and every probe perturbs it only through a
//! [`SandboxGuard`] that snapshots the search path and the set of loaded
//! module names on construction and restores both on drop, whichever way the
//! probe exits.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rustpython_ast::{Constant, Expr, Operator, Stmt};
use rustpython_parser::Parse;

use super::error::ProbeError;
use crate::discover::filter::MARKER_FILE;

//─────────────────────────────────────────────────────────────────────────────

/// The single seam between the resolver and the mechanism used to inspect a
/// loaded unit of code.
pub trait Introspectable {
    /// The declared export list (`__all__`), `None` when no list is declared.
    fn declared_exports(&self) -> Option<Vec<String>>;

    /// True when a non-empty documentation string is attached.
    fn has_documentation(&self) -> bool;
}

/// A module loaded into the import environment: the parsed statement body of
/// its marker file.
pub struct ParsedModule {
    body: Vec<Stmt>,
}

impl ParsedModule {
    pub(crate) fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

impl Introspectable for ParsedModule {
    fn declared_exports(&self) -> Option<Vec<String>> {
        let mut exports: Option<Vec<String>> = None;
        for stmt in &self.body {
            match stmt {
                Stmt::Assign(assign) => {
                    if assign.targets.iter().any(is_all_name) {
                        exports = string_elements(&assign.value);
                    }
                }
                // `__all__ += [...]` extends a previously declared list.
                Stmt::AugAssign(aug)
                    if matches!(aug.op, Operator::Add) && is_all_name(&aug.target) =>
                {
                    if let (Some(existing), Some(more)) =
                        (exports.as_mut(), string_elements(&aug.value))
                    {
                        existing.extend(more);
                    }
                }
                _ => {}
            }
        }
        exports
    }

    fn has_documentation(&self) -> bool {
        // A docstring is a string-constant expression statement leading the body.
        let Some(Stmt::Expr(first)) = self.body.first() else {
            return false;
        };
        match first.value.as_ref() {
            Expr::Constant(constant) => match &constant.value {
                Constant::Str(s) => !s.to_string().trim().is_empty(),
                _ => false,
            },
            _ => false,
        }
    }
}

fn is_all_name(expr: &Expr) -> bool {
    matches!(expr, Expr::Name(name) if name.id.as_str() == "__all__")
}

/// Collects the string constants of a list or tuple literal. Returns `None`
/// when the expression is neither, which reads the same as a missing or
/// dynamically-built export list.
fn string_elements(expr: &Expr) -> Option<Vec<String>> {
    let elts = match expr {
        Expr::List(list) => &list.elts,
        Expr::Tuple(tuple) => &tuple.elts,
        _ => return None,
    };
    Some(
        elts.iter()
            .filter_map(|element| match element {
                Expr::Constant(constant) => match &constant.value {
                    Constant::Str(s) => Some(s.to_string()),
                    _ => None,
                },
                _ => None,
            })
            .collect(),
    )
}

//─────────────────────────────────────────────────────────────────────────────

/// Search path plus loaded-module registry, the only shared mutable resource
/// of a discovery run.
#[derive(Default)]
pub struct ImportEnvironment {
    search_path: Vec<PathBuf>,
    modules: HashMap<String, ParsedModule>,
}

impl ImportEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current import search path, in resolution order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// The dotted names of all currently loaded modules.
    pub fn loaded_names(&self) -> HashSet<String> {
        self.modules.keys().cloned().collect()
    }
}

/// Scoped snapshot of an [`ImportEnvironment`].
///
/// Constructing the guard captures the search path and the loaded-module
/// names; dropping it removes exactly the newly loaded modules and restores
/// the search path, so a probe has no observable effect on later probes.
pub struct SandboxGuard<'a> {
    env: &'a mut ImportEnvironment,
    saved_path: Vec<PathBuf>,
    saved_names: HashSet<String>,
}

impl<'a> SandboxGuard<'a> {
    pub fn new(env: &'a mut ImportEnvironment) -> Self {
        let saved_path = env.search_path.clone();
        let saved_names = env.loaded_names();
        Self {
            env,
            saved_path,
            saved_names,
        }
    }

    /// Appends `dir` to the import search path for the lifetime of the guard.
    pub fn extend_search_path(&mut self, dir: PathBuf) {
        self.env.search_path.push(dir);
    }

    /// Imports `dotted` by locating its top-level package on the search path
    /// and loading the marker file of every segment into the registry.
    /// Already-loaded names are reused, never reloaded, so an existing module
    /// is never shadowed by a same-named package found later on the path.
    pub fn import(&mut self, dotted: &str) -> Result<&ParsedModule, ProbeError> {
        let Some(top) = dotted.split('.').next().filter(|s| !s.is_empty()) else {
            return Err(ProbeError::ModuleNotFound(dotted.to_string()));
        };
        let base = self
            .env
            .search_path
            .iter()
            .find(|dir| dir.join(top).join(MARKER_FILE).is_file())
            .cloned()
            .ok_or_else(|| ProbeError::ModuleNotFound(dotted.to_string()))?;

        let mut location = base;
        let mut name = String::new();
        for segment in dotted.split('.') {
            location = location.join(segment);
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(segment);
            if !self.env.modules.contains_key(&name) {
                let module = load_marker_file(&location)?;
                self.env.modules.insert(name.clone(), module);
            }
        }
        self.env
            .modules
            .get(dotted)
            .ok_or_else(|| ProbeError::ModuleNotFound(dotted.to_string()))
    }
}

impl Drop for SandboxGuard<'_> {
    fn drop(&mut self) {
        let current: Vec<String> = self.env.modules.keys().cloned().collect();
        for name in current {
            if !self.saved_names.contains(&name) {
                self.env.modules.remove(&name);
            }
        }
        self.env.search_path = std::mem::take(&mut self.saved_path);
    }
}

/// Reads and parses the marker file of one package directory.
fn load_marker_file(package_dir: &Path) -> Result<ParsedModule, ProbeError> {
    let marker = package_dir.join(MARKER_FILE);
    let source =
        fs::read_to_string(&marker).map_err(|e| ProbeError::ReadSource(marker.clone(), e))?;
    let body: Vec<Stmt> =
        Parse::parse_without_path(&source).map_err(|e| ProbeError::ParseSource(marker, e))?;
    Ok(ParsedModule::new(body))
}

//─────────────────────────────────────────────────────────────────────────────
