//! Pure predicates over file and directory names, plus the lexical path
//! normalization used to build the exclusion set. No I/O, no side effects.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Marker file whose presence makes a directory a package.
pub const MARKER_FILE: &str = "__init__.py";

/// Recognized source-module extensions.
pub const SOURCE_SUFFIXES: [&str; 2] = ["py", "pyx"];

/// Leading character marking a name as private.
pub const PRIVATE_MARKER: char = '_';

/// Leading character marking a directory as hidden.
pub const HIDDEN_MARKER: char = '.';

//─────────────────────────────────────────────────────────────────────────────

/// True iff the normalized path is exactly a member of the exclusion set.
/// Membership is not prefix-based: the walker stops descending into excluded
/// directories explicitly, so their contents never come up for testing.
pub fn is_excluded(normalized_path: &Path, exclusions: &BTreeSet<PathBuf>) -> bool {
    exclusions.contains(normalized_path)
}

/// True iff the name starts with the private-name marker.
pub fn is_private_name(name: &str) -> bool {
    name.starts_with(PRIVATE_MARKER)
}

/// True iff the filename carries a recognized source-module extension and is
/// not the package-marker file itself.
pub fn is_source_module(filename: &str) -> bool {
    if filename == MARKER_FILE {
        return false;
    }
    match filename.rsplit_once('.') {
        Some((stem, extension)) => !stem.is_empty() && SOURCE_SUFFIXES.contains(&extension),
        None => false,
    }
}

/// Module name of a source file: the filename without its extension.
pub fn module_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}

/// Lexically normalizes a path: makes it absolute against the current
/// directory and folds `.` and `..` components without touching the
/// filesystem, so paths that do not exist can still be compared.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Normalizes an exclusion list into the absolute, normalized set the walker
/// expects.
pub fn normalize_excludes<I>(excludes: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    excludes
        .into_iter()
        .map(|path| normalize_path(&path))
        .collect()
}

//─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_module_recognition() {
        assert!(is_source_module("mod.py"));
        assert!(is_source_module("mod.pyx"));
        assert!(!is_source_module("__init__.py"));
        assert!(!is_source_module("mod.txt"));
        assert!(!is_source_module("mod"));
        assert!(!is_source_module(".py"));
    }

    #[test]
    fn private_name_marker() {
        assert!(is_private_name("_private"));
        assert!(is_private_name("__init__"));
        assert!(!is_private_name("public"));
    }

    #[test]
    fn module_stem_strips_one_extension() {
        assert_eq!(module_stem("mod.py"), "mod");
        assert_eq!(module_stem("mod.tar.py"), "mod.tar");
        assert_eq!(module_stem("mod"), "mod");
    }

    #[test]
    fn normalization_folds_dot_components() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
        assert_eq!(normalize_path(Path::new("/a/../..")), PathBuf::from("/"));
    }

    #[test]
    fn exclusion_is_exact_membership() {
        let exclusions = normalize_excludes(vec![PathBuf::from("/root/pkg/skip")]);
        assert!(is_excluded(Path::new("/root/pkg/skip"), &exclusions));
        assert!(!is_excluded(Path::new("/root/pkg/skip/inner"), &exclusions));
        assert!(!is_excluded(Path::new("/root/pkg"), &exclusions));
    }
}
