//! Combines the walker's yield with introspection results into the final
//! ordered set of documentable units.

use std::path::Path;

use super::error::DiscoverError;
use super::filter::{self, MARKER_FILE};
use super::options::DiscoveryOptions;
use super::walker::TreeWalker;
use crate::introspect::{DiagnosticsSink, Introspector};

//─────────────────────────────────────────────────────────────────────────────

/// One documentable unit: a dotted package name together with the direct
/// children its stub should claim to document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUnit {
    /// Non-empty, dot-separated identifiers; never begins or ends with '.'.
    pub dotted_name: String,
    /// Direct submodule names, single segments, unique. Sorted, except that
    /// a declared export list dictates its own order.
    pub direct_submodules: Vec<String>,
    /// Direct subpackage names, single segments, sorted, unique.
    pub direct_subpackages: Vec<String>,
}

/// Result of one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Documentable packages, parents before children, siblings sorted.
    pub packages: Vec<PackageUnit>,
    /// Top-level loose modules, non-empty only when the root is not itself a
    /// package.
    pub loose_modules: Vec<String>,
}

/// Resolves the documentable units under `rootpath`.
///
/// When `respect_exports` is set, each package's submodule list is replaced
/// by the intersection (in export-list order) of its declared export list
/// with the source modules actually present in its directory; packages with
/// no children but a declared surface are still yielded.
///
/// # Errors
/// Fails on conflicting options, on a missing or non-directory root, on
/// unreadable directories, and, under the strict failure policy, on the
/// first package that cannot be probed.
pub fn discover(
    rootpath: &Path,
    options: &DiscoveryOptions,
    sink: &mut dyn DiagnosticsSink,
) -> Result<Discovery, DiscoverError> {
    options.validate()?;
    let root = filter::normalize_path(rootpath);
    if !root.is_dir() {
        return Err(DiscoverError::RootNotADirectory(root));
    }

    let mut introspector = options
        .respect_exports
        .then(|| Introspector::new(Some(root.clone()), options.failure_policy));

    let walker = TreeWalker::new(&root, options);
    let mut discovery = Discovery::default();
    if !root.join(MARKER_FILE).is_file() {
        discovery.loose_modules = walker.loose_modules()?;
    }

    for candidate in walker.walk(introspector.as_mut(), sink)? {
        let mut submodules = candidate.submodules;
        let mut keep = !submodules.is_empty() || !candidate.subpackages.is_empty();
        if let Some(intro) = introspector.as_mut() {
            let probe = intro.probe(&candidate.location, sink)?;
            if let Some(exports) = probe.export_list.as_ref() {
                // the declaration overrides the privacy policy, so the
                // intersection runs against everything on disk
                submodules = intersect_exports(exports, &candidate.source_modules);
                keep = !submodules.is_empty() || !candidate.subpackages.is_empty();
            }
            // aggregator packages re-exporting names from elsewhere have no
            // children on disk but still deserve a stub
            keep = keep || probe.has_surface();
        }
        if keep {
            discovery.packages.push(PackageUnit {
                dotted_name: candidate.dotted_name,
                direct_submodules: submodules,
                direct_subpackages: candidate.subpackages,
            });
        }
    }
    Ok(discovery)
}

/// Declared exports that are actually present as source modules, kept in
/// export-list order, deduplicated.
fn intersect_exports(exports: &[String], present: &[String]) -> Vec<String> {
    let mut resolved = Vec::new();
    for name in exports {
        if present.contains(name) && !resolved.contains(name) {
            resolved.push(name.clone());
        }
    }
    resolved
}

//─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{NullSink, ProbeError};
    use std::fs;
    use std::path::PathBuf;

    struct CollectSink(Vec<PathBuf>);

    impl DiagnosticsSink for CollectSink {
        fn probe_failed(&mut self, location: &Path, _error: &ProbeError) {
            self.0.push(location.to_path_buf());
        }
    }

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Builds the tree from the end-to-end scenario: `pkg` with a docstring
    /// and no export list, `pkg/a.py`, `pkg/_b.py`, `pkg/sub` exporting only
    /// `x` with `x.py` and `y.py` on disk.
    fn scenario_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "\"\"\"A package.\"\"\"\n");
        write(root.join("pkg/a.py"), "");
        write(root.join("pkg/_b.py"), "");
        write(root.join("pkg/sub/__init__.py"), "__all__ = ['x']\n");
        write(root.join("pkg/sub/x.py"), "");
        write(root.join("pkg/sub/y.py"), "");
        dir
    }

    fn unit<'d>(discovery: &'d Discovery, name: &str) -> &'d PackageUnit {
        discovery
            .packages
            .iter()
            .find(|u| u.dotted_name == name)
            .unwrap_or_else(|| panic!("no unit named {name}"))
    }

    #[test]
    fn end_to_end_default_options() {
        let dir = scenario_tree();
        let discovery =
            discover(dir.path(), &DiscoveryOptions::default(), &mut NullSink).unwrap();

        assert!(discovery.loose_modules.is_empty());
        let names: Vec<&str> = discovery
            .packages
            .iter()
            .map(|u| u.dotted_name.as_str())
            .collect();
        assert_eq!(names, ["pkg", "pkg.sub"]);

        let pkg = unit(&discovery, "pkg");
        assert_eq!(pkg.direct_submodules, ["a"]);
        assert_eq!(pkg.direct_subpackages, ["sub"]);

        let sub = unit(&discovery, "pkg.sub");
        assert_eq!(sub.direct_submodules, ["x", "y"]);
        assert!(sub.direct_subpackages.is_empty());
    }

    #[test]
    fn end_to_end_respecting_exports() {
        let dir = scenario_tree();
        let options = DiscoveryOptions {
            respect_exports: true,
            ..Default::default()
        };
        let discovery = discover(dir.path(), &options, &mut NullSink).unwrap();

        let pkg = unit(&discovery, "pkg");
        assert_eq!(pkg.direct_submodules, ["a"]);
        let sub = unit(&discovery, "pkg.sub");
        assert_eq!(sub.direct_submodules, ["x"]);
    }

    #[test]
    fn export_list_order_wins_over_lexicographic() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "__all__ = ['b', 'a']\n");
        write(root.join("pkg/a.py"), "");
        write(root.join("pkg/b.py"), "");
        write(root.join("pkg/c.py"), "");

        let options = DiscoveryOptions {
            respect_exports: true,
            ..Default::default()
        };
        let discovery = discover(root, &options, &mut NullSink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_submodules, ["b", "a"]);
    }

    #[test]
    fn declared_private_export_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "__all__ = ['_b', 'a']\n");
        write(root.join("pkg/a.py"), "");
        write(root.join("pkg/_b.py"), "");

        let options = DiscoveryOptions {
            respect_exports: true,
            ..Default::default()
        };
        let discovery = discover(root, &options, &mut NullSink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_submodules, ["_b", "a"]);
    }

    #[test]
    fn excluded_file_is_dropped_from_declared_exports() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "__all__ = ['a', 'b']\n");
        write(root.join("pkg/a.py"), "");
        write(root.join("pkg/b.py"), "");

        let options = DiscoveryOptions {
            respect_exports: true,
            exclusions: filter::normalize_excludes(vec![root.join("pkg/b.py")]),
            ..Default::default()
        };
        let discovery = discover(root, &options, &mut NullSink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_submodules, ["a"]);
    }

    #[test]
    fn aggregator_package_is_kept_with_empty_children() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "");
        write(root.join("pkg/a.py"), "");
        write(
            root.join("pkg/agg/__init__.py"),
            "__all__ = ['reexported']\n",
        );

        let options = DiscoveryOptions {
            respect_exports: true,
            ..Default::default()
        };
        let discovery = discover(root, &options, &mut NullSink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_subpackages, ["agg"]);
        let agg = unit(&discovery, "pkg.agg");
        assert!(agg.direct_submodules.is_empty());
        assert!(agg.direct_subpackages.is_empty());
    }

    #[test]
    fn empty_export_list_prunes_the_subpackage() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "");
        write(root.join("pkg/a.py"), "");
        write(root.join("pkg/empty/__init__.py"), "__all__ = []\n");
        write(root.join("pkg/empty/m.py"), "");

        let options = DiscoveryOptions {
            respect_exports: true,
            ..Default::default()
        };
        let discovery = discover(root, &options, &mut NullSink).unwrap();
        assert!(unit(&discovery, "pkg").direct_subpackages.is_empty());
        assert!(!discovery.packages.iter().any(|u| u.dotted_name == "pkg.empty"));
    }

    #[test]
    fn private_subtree_yields_nothing_even_with_public_descendants() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("_hidden/__init__.py"), "");
        write(root.join("_hidden/pub/__init__.py"), "");
        write(root.join("_hidden/pub/m.py"), "");
        write(root.join("pkg/__init__.py"), "");
        write(root.join("pkg/a.py"), "");

        let discovery =
            discover(root, &DiscoveryOptions::default(), &mut NullSink).unwrap();
        let names: Vec<&str> = discovery
            .packages
            .iter()
            .map(|u| u.dotted_name.as_str())
            .collect();
        assert_eq!(names, ["pkg"]);
    }

    #[test]
    fn include_private_surfaces_private_names() {
        let dir = scenario_tree();
        let options = DiscoveryOptions {
            include_private: true,
            ..Default::default()
        };
        let discovery = discover(dir.path(), &options, &mut NullSink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_submodules, ["_b", "a"]);
    }

    #[test]
    fn private_root_package_is_pruned_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("_priv");
        write(root.join("__init__.py"), "");
        write(root.join("a.py"), "");

        let discovery =
            discover(&root, &DiscoveryOptions::default(), &mut NullSink).unwrap();
        assert!(discovery.packages.is_empty());
        assert!(discovery.loose_modules.is_empty());
    }

    #[test]
    fn loose_modules_when_root_is_not_a_package() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("top.py"), "");
        write(root.join("_secret.py"), "");
        write(root.join("notes.txt"), "");
        write(root.join("plain_dir/data.py"), "");

        let discovery =
            discover(root, &DiscoveryOptions::default(), &mut NullSink).unwrap();
        assert_eq!(discovery.loose_modules, ["top"]);
        // a directory without the marker file is never yielded
        assert!(discovery.packages.is_empty());
    }

    #[test]
    fn every_yielded_name_corresponds_to_a_marker_directory() {
        let dir = scenario_tree();
        let root = dir.path();
        write(root.join("pkg/plain/inner.py"), "");

        let discovery =
            discover(root, &DiscoveryOptions::default(), &mut NullSink).unwrap();
        for package in &discovery.packages {
            let mut location = root.to_path_buf();
            for segment in package.dotted_name.split('.') {
                location = location.join(segment);
            }
            assert!(location.join("__init__.py").is_file(), "{package:?}");
        }
        assert!(!discovery.packages.iter().any(|u| u.dotted_name.contains("plain")));
    }

    #[test]
    fn discovery_is_idempotent() {
        let dir = scenario_tree();
        let options = DiscoveryOptions::default();
        let first = discover(dir.path(), &options, &mut NullSink).unwrap();
        let second = discover(dir.path(), &options, &mut NullSink).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn exclusion_is_monotonic() {
        let dir = scenario_tree();
        let unrestricted =
            discover(dir.path(), &DiscoveryOptions::default(), &mut NullSink).unwrap();

        let options = DiscoveryOptions {
            exclusions: filter::normalize_excludes(vec![dir.path().join("pkg/sub")]),
            ..Default::default()
        };
        let restricted = discover(dir.path(), &options, &mut NullSink).unwrap();

        assert!(restricted.packages.len() < unrestricted.packages.len());
        assert!(!restricted.packages.iter().any(|u| u.dotted_name == "pkg.sub"));
        assert!(unit(&restricted, "pkg").direct_subpackages.is_empty());
        // adding an exclusion never yields a name that was absent before
        for package in &restricted.packages {
            assert!(unrestricted
                .packages
                .iter()
                .any(|u| u.dotted_name == package.dotted_name));
        }
    }

    #[test]
    fn excluded_file_disappears_from_submodules() {
        let dir = scenario_tree();
        let options = DiscoveryOptions {
            exclusions: filter::normalize_excludes(vec![dir.path().join("pkg/a.py")]),
            ..Default::default()
        };
        let discovery = discover(dir.path(), &options, &mut NullSink).unwrap();
        assert!(unit(&discovery, "pkg").direct_submodules.is_empty());
    }

    #[test]
    fn broken_package_falls_back_to_filesystem_inclusion() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "def broken(:\n");
        write(root.join("pkg/a.py"), "");

        let options = DiscoveryOptions {
            respect_exports: true,
            ..Default::default()
        };
        let mut sink = CollectSink(Vec::new());
        let discovery = discover(root, &options, &mut sink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_submodules, ["a"]);
        assert_eq!(sink.0, vec![filter::normalize_path(&root.join("pkg"))]);
    }

    #[test]
    fn strict_policy_makes_broken_packages_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "def broken(:\n");
        write(root.join("pkg/a.py"), "");

        let options = DiscoveryOptions {
            respect_exports: true,
            failure_policy: crate::introspect::FailurePolicy::Strict,
            ..Default::default()
        };
        assert!(matches!(
            discover(root, &options, &mut NullSink),
            Err(DiscoverError::Probe(_))
        ));
    }

    #[test]
    fn missing_root_is_a_structural_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover(&missing, &DiscoveryOptions::default(), &mut NullSink),
            Err(DiscoverError::RootNotADirectory(_))
        ));
    }

    #[test]
    fn conflicting_options_fail_before_any_walk() {
        let options = DiscoveryOptions {
            include_private: true,
            respect_exports: true,
            ..Default::default()
        };
        // the root does not even exist; validation must fire first
        assert!(matches!(
            discover(Path::new("/nonexistent"), &options, &mut NullSink),
            Err(DiscoverError::ConflictingOptions(_))
        ));
    }

    #[test]
    fn hidden_directories_are_never_packages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root.join("pkg/__init__.py"), "");
        write(root.join("pkg/a.py"), "");
        write(root.join("pkg/.cache/__init__.py"), "");
        write(root.join("pkg/.cache/m.py"), "");

        let discovery =
            discover(root, &DiscoveryOptions::default(), &mut NullSink).unwrap();
        assert_eq!(unit(&discovery, "pkg").direct_subpackages, Vec::<String>::new());
    }

    #[test]
    fn root_package_uses_its_own_basename() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("mypkg");
        write(root.join("__init__.py"), "");
        write(root.join("a.py"), "");

        let discovery =
            discover(&root, &DiscoveryOptions::default(), &mut NullSink).unwrap();
        assert_eq!(discovery.packages.len(), 1);
        assert_eq!(discovery.packages[0].dotted_name, "mypkg");
        assert!(discovery.loose_modules.is_empty());
    }
}
