//! Provides utility functions for file system operations critical to the
//! application: validating the root directory, preparing the output
//! directory, and writing generated stubs with force/dry-run semantics.
//! Uses macros from the parent `app` module for verbose logging.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Error as IoError, Write};
use std::path::{Path, PathBuf};
// Use super:: for macros defined in app/mod.rs
use super::error::AppError;
use super::{verbose_eprintln, verbose_println};

/// Validates the module path argument: it must exist and be a directory.
///
/// # Errors
/// Returns `AppError::InvalidPath` if the path is missing or not a directory.
pub fn validate_root_dir(rootpath: &Path, quiet_mode: bool) -> Result<(), AppError> {
    if !rootpath.exists() {
        let error_msg = format!("Directory not found: {}", rootpath.display());
        verbose_eprintln!(quiet_mode, "Input Error: {}", error_msg);
        return Err(AppError::InvalidPath(error_msg));
    }
    if !rootpath.is_dir() {
        let error_msg = format!("Path is not a directory: {}", rootpath.display());
        verbose_eprintln!(quiet_mode, "Input Error: {}", error_msg);
        return Err(AppError::InvalidPath(error_msg));
    }
    Ok(())
}

/// Strips the leading dot off a user-supplied suffix, so `.rst` and `rst`
/// name files the same way. Only one dot is stripped; a suffix of `..rst`
/// keeps its remaining dot.
pub fn normalize_suffix(suffix: &str) -> &str {
    suffix.strip_prefix('.').unwrap_or(suffix)
}

/// Ensures the output directory exists, creating it unless in dry-run mode.
pub fn ensure_output_dir(output_dir: &Path, dry_run: bool) -> Result<(), AppError> {
    if !output_dir.is_dir() && !dry_run {
        fs::create_dir_all(output_dir)?;
    }
    Ok(())
}

/// Writes one generated stub for `name` into the output directory.
///
/// In dry-run mode the write is only reported. Existing files are skipped
/// unless `force` is set, so reruns never clobber hand-edited stubs.
///
/// # Errors
/// Returns `AppError::Io` if the file cannot be written.
pub fn write_stub(
    output_dir: &Path,
    name: &str,
    suffix: &str,
    text: &str,
    force: bool,
    dry_run: bool,
    quiet_mode: bool,
) -> Result<PathBuf, AppError> {
    let file_path = output_dir.join(format!("{name}.{suffix}"));
    if dry_run {
        verbose_println!(quiet_mode, "Would create file {}.", file_path.display());
        return Ok(file_path);
    }
    if !force && file_path.is_file() {
        verbose_println!(
            quiet_mode,
            "File {} already exists, skipping.",
            file_path.display()
        );
        return Ok(file_path);
    }
    verbose_println!(quiet_mode, "Creating file {}.", file_path.display());
    write_content_to_file(&file_path, text)?;
    Ok(file_path)
}

/// Writes string content to a specified file, creating or overwriting it.
///
/// The entire content is written through a `BufWriter` and explicitly
/// flushed, so the caller sees the complete file immediately after a
/// successful call.
pub fn write_content_to_file(file_path: &Path, content: &str) -> Result<(), IoError> {
    let file = OpenOptions::new()
        .create(true) // Create if it doesn't exist.
        .write(true) // Open for writing.
        .truncate(true) // Truncate to 0 bytes if it exists.
        .open(file_path)?;
    let mut writer = BufWriter::new(file); // Default buffer capacity.
    writer.write_all(content.as_bytes())?;
    writer.flush()?; // Ensure all buffered content is written to disk.
    Ok(())
}

//─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_stub_is_skipped_without_force() {
        let dir = tempfile::tempdir().unwrap();
        write_stub(dir.path(), "pkg", "rst", "first", false, false, true).unwrap();
        write_stub(dir.path(), "pkg", "rst", "second", false, false, true).unwrap();
        let contents = fs::read_to_string(dir.path().join("pkg.rst")).unwrap();
        assert_eq!(contents, "first");

        write_stub(dir.path(), "pkg", "rst", "second", true, false, true).unwrap();
        let contents = fs::read_to_string(dir.path().join("pkg.rst")).unwrap();
        assert_eq!(contents, "second");
    }

    #[test]
    fn suffix_loses_exactly_one_leading_dot() {
        assert_eq!(normalize_suffix("rst"), "rst");
        assert_eq!(normalize_suffix(".rst"), "rst");
        assert_eq!(normalize_suffix("..rst"), ".rst");
    }

    #[test]
    fn dry_run_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_stub(dir.path(), "pkg", "rst", "text", false, true, true).unwrap();
        assert!(!dir.path().join("pkg.rst").exists());
    }
}
