//! Directory traversal: finds package boundaries and computes, for each one,
//! the candidate submodules and subpackages that survive the pruning rules.
//!
//! Descent is restricted to candidate subpackages, so traversal cost stays
//! linear in the number of documented packages. Sibling order is made
//! deterministic by sorting directory entries.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::DiscoverError;
use super::filter::{self, HIDDEN_MARKER, MARKER_FILE};
use super::options::DiscoveryOptions;
use crate::introspect::{DiagnosticsSink, Introspector};

//─────────────────────────────────────────────────────────────────────────────

/// One package directory that survived pruning, before export-list filtering.
pub(crate) struct PackageCandidate {
    pub dotted_name: String,
    pub location: PathBuf,
    pub submodules: Vec<String>,
    /// Every source-module stem on disk (minus exclusions), private ones
    /// included. A declared export list is intersected with these, since a
    /// package may explicitly export a private-named module.
    pub source_modules: Vec<String>,
    pub subpackages: Vec<String>,
}

/// Sorted directory listing, split into files and subdirectories.
struct DirEntries {
    files: Vec<String>,
    dirs: Vec<String>,
}

pub(crate) struct TreeWalker<'a> {
    root: &'a Path,
    options: &'a DiscoveryOptions,
}

impl<'a> TreeWalker<'a> {
    /// `root` must already be normalized.
    pub fn new(root: &'a Path, options: &'a DiscoveryOptions) -> Self {
        Self { root, options }
    }

    /// Walks from the root, yielding a candidate for every package directory
    /// that survives pruning, parents before children, siblings in sorted
    /// order. The root itself is yielded only when it carries the package
    /// marker; otherwise its qualifying package subdirectories become the
    /// toplevels.
    pub fn walk(
        &self,
        mut introspector: Option<&mut Introspector>,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<Vec<PackageCandidate>, DiscoverError> {
        let mut yielded = Vec::new();
        if filter::is_excluded(self.root, &self.options.exclusions) {
            return Ok(yielded);
        }

        let root_is_package = self.root.join(MARKER_FILE).is_file();
        // a private package's descendants are never independently documented
        if root_is_package
            && !self.options.include_private
            && filter::is_private_name(&self.root_name())
        {
            return Ok(yielded);
        }

        // directories still to visit, paired with their dotted names
        let mut pending: Vec<(PathBuf, String)> = Vec::new();
        if root_is_package {
            pending.push((self.root.to_path_buf(), self.root_name()));
        } else {
            let entries = self.read_sorted(self.root)?;
            let toplevels = self.candidate_subpackages(
                self.root,
                &entries.dirs,
                introspector.as_deref_mut(),
                sink,
            )?;
            for name in toplevels.iter().rev() {
                pending.push((self.root.join(name), name.clone()));
            }
        }

        while let Some((dir, dotted_name)) = pending.pop() {
            let entries = self.read_sorted(&dir)?;
            let submodules =
                self.submodule_stems(&dir, &entries.files, self.options.include_private);
            let source_modules = self.submodule_stems(&dir, &entries.files, true);
            let subpackages = self.candidate_subpackages(
                &dir,
                &entries.dirs,
                introspector.as_deref_mut(),
                sink,
            )?;
            for name in subpackages.iter().rev() {
                pending.push((dir.join(name), format!("{dotted_name}.{name}")));
            }
            yielded.push(PackageCandidate {
                dotted_name,
                location: dir,
                submodules,
                source_modules,
                subpackages,
            });
        }
        Ok(yielded)
    }

    /// Qualifying source files directly inside a non-package root, documented
    /// as individual top-level modules.
    pub fn loose_modules(&self) -> Result<Vec<String>, DiscoverError> {
        if filter::is_excluded(self.root, &self.options.exclusions) {
            return Ok(Vec::new());
        }
        let entries = self.read_sorted(self.root)?;
        Ok(self.submodule_stems(self.root, &entries.files, self.options.include_private))
    }

    fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Every file in `files` matching the source-module predicate, not
    /// excluded, and public unless `include_private`. Sorted input keeps the
    /// output sorted; equal stems from `.py`/`.pyx` twins collapse.
    fn submodule_stems(&self, dir: &Path, files: &[String], include_private: bool) -> Vec<String> {
        let mut stems: Vec<String> = files
            .iter()
            .filter(|name| filter::is_source_module(name))
            .filter(|name| {
                !filter::is_excluded(
                    &filter::normalize_path(&dir.join(name.as_str())),
                    &self.options.exclusions,
                )
            })
            .filter(|name| include_private || !filter::is_private_name(name))
            .map(|name| filter::module_stem(name).to_string())
            .collect();
        stems.dedup();
        stems
    }

    /// Every subdirectory that is not hidden, not private (unless included),
    /// not excluded, carries the package marker, and is judged worth
    /// documenting when export lists are respected.
    fn candidate_subpackages(
        &self,
        dir: &Path,
        dirs: &[String],
        mut introspector: Option<&mut Introspector>,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<Vec<String>, DiscoverError> {
        let mut candidates = Vec::new();
        for name in dirs {
            if name.starts_with(HIDDEN_MARKER) {
                continue;
            }
            if !self.options.include_private && filter::is_private_name(name) {
                continue;
            }
            let location = dir.join(name);
            if filter::is_excluded(&filter::normalize_path(&location), &self.options.exclusions) {
                continue;
            }
            if !location.join(MARKER_FILE).is_file() {
                continue;
            }
            if let Some(intro) = introspector.as_deref_mut() {
                if !intro.probe(&location, sink)?.worth_documenting() {
                    continue;
                }
            }
            candidates.push(name.clone());
        }
        Ok(candidates)
    }

    fn read_sorted(&self, dir: &Path) -> Result<DirEntries, DiscoverError> {
        let read_err = |e| DiscoverError::ReadDir(dir.to_path_buf(), e);
        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            // names that are not valid UTF-8 cannot become dotted names
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let file_type = entry.file_type().map_err(read_err)?;
            if file_type.is_symlink() {
                if !self.options.follow_symlinks {
                    continue;
                }
                let target = dir.join(&name);
                if target.is_dir() {
                    dirs.push(name);
                } else if target.is_file() {
                    files.push(name);
                }
            } else if file_type.is_dir() {
                dirs.push(name);
            } else {
                files.push(name);
            }
        }
        files.sort();
        dirs.sort();
        Ok(DirEntries { files, dirs })
    }
}
