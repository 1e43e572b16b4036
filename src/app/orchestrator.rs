//! Main application orchestrator.
//!
//! Coordinates the stub generation process:
//! 1. Initializes logging.
//! 2. Validates option combinations, the module path and the output directory.
//! 3. Runs discovery (directory walk plus optional `__all__` introspection).
//! 4. Writes one stub page per loose module and per package unit.
//! 5. Writes the table-of-contents page unless disabled.
//! 6. Provides summary messages to the user.
//!
//! Adheres to command-line arguments like `quiet_mode` for controlling verbosity.

use std::path::Path;

use super::cli::Cli;
use super::error::AppError;
use super::file_handler;
use super::logger;
use super::render;
use super::{verbose_eprintln, verbose_println}; // Macros for conditional logging.
use crate::discover::{self, DiscoveryOptions};
use crate::introspect::{DiagnosticsSink, FailurePolicy, ProbeError};

/// Diagnostics sink that records recoverable probe failures in the verbose
/// log and on stderr, so they stay visible without halting discovery.
struct LogSink {
    quiet_mode: bool,
}

impl DiagnosticsSink for LogSink {
    fn probe_failed(&mut self, location: &Path, error: &ProbeError) {
        verbose_eprintln!(
            self.quiet_mode,
            "[WARNING] Could not introspect {}: {}",
            location.display(),
            error
        );
        eprintln!(
            "Warning: could not introspect {} ({}); falling back to its filesystem contents. Exclude this package to silence.",
            location.display(),
            error
        );
    }
}

/// Runs the main application logic based on parsed command-line arguments.
///
/// # Errors
/// Returns `AppError` if any unrecoverable error occurs: conflicting options,
/// an invalid module path, a discovery failure, or critical I/O failures
/// while writing stubs.
pub fn run_app(cli: Cli) -> Result<(), AppError> {
    let quiet_mode = cli.quiet;

    // Initialize global logger if not in quiet mode. This setup is done once.
    if !quiet_mode {
        if let Err(e) = logger::init_global_logger("apidoc.log") {
            // If logger init fails, print to stderr directly. The application
            // attempts to continue, but verbose file logging will be unavailable.
            eprintln!(
                "Warning: Failed to initialize verbose logger (apidoc.log): {}. Verbose file logging will be unavailable.",
                e
            );
        } else {
            verbose_println!(quiet_mode, "Verbose logging initialized to apidoc.log");
        }
    }

    let options = DiscoveryOptions {
        include_private: cli.include_private,
        respect_exports: cli.respect_all,
        follow_symlinks: cli.follow_links,
        exclusions: discover::normalize_excludes(cli.exclude_paths.clone()),
        failure_policy: if cli.strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::BestEffort
        },
    };
    // Conflicting options are fatal before anything touches the filesystem.
    options.validate()?;

    file_handler::validate_root_dir(&cli.module_path, quiet_mode)?;
    file_handler::ensure_output_dir(&cli.output_dir, cli.dry_run)?;

    let rootpath = discover::normalize_path(&cli.module_path);

    verbose_println!(
        quiet_mode,
        "\n============================================================"
    );
    verbose_println!(
        quiet_mode,
        "Discovering packages under: {}",
        rootpath.display()
    );
    verbose_println!(
        quiet_mode,
        "============================================================"
    );

    let mut sink = LogSink { quiet_mode };
    let discovery = discover::discover(&rootpath, &options, &mut sink)?;

    verbose_println!(
        quiet_mode,
        "   => Found {} package(s) and {} loose module(s).",
        discovery.packages.len(),
        discovery.loose_modules.len()
    );
    if !quiet_mode {
        if let Err(e) = logger::flush_global_logger() {
            eprintln!("[WARNING] Failed to flush apidoc.log after discovery: {}", e);
        }
    }

    let suffix = file_handler::normalize_suffix(&cli.suffix);
    let render_options = render::RenderOptions {
        separate_modules: cli.separate_modules,
        no_headings: cli.no_headings,
        module_first: cli.module_first,
    };
    let mut toplevels: Vec<String> = Vec::new();

    for module in &discovery.loose_modules {
        let text = render::module_page(module, &render_options);
        file_handler::write_stub(
            &cli.output_dir,
            module,
            suffix,
            &text,
            cli.force,
            cli.dry_run,
            quiet_mode,
        )?;
        toplevels.push(module.clone());
    }

    for unit in &discovery.packages {
        let text = render::package_page(unit, &render_options);
        file_handler::write_stub(
            &cli.output_dir,
            &unit.dotted_name,
            suffix,
            &text,
            cli.force,
            cli.dry_run,
            quiet_mode,
        )?;
        if cli.separate_modules {
            // The package page links these through its toctree; each needs
            // its own stub, but none is a TOC toplevel.
            for submodule in &unit.direct_submodules {
                let dotted = format!("{}.{}", unit.dotted_name, submodule);
                let text = render::module_page(&dotted, &render_options);
                file_handler::write_stub(
                    &cli.output_dir,
                    &dotted,
                    suffix,
                    &text,
                    cli.force,
                    cli.dry_run,
                    quiet_mode,
                )?;
            }
        }
        toplevels.push(unit.dotted_name.clone());
    }

    if !cli.no_toc {
        let header = cli.header.clone().unwrap_or_else(|| {
            rootpath
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "modules".to_string())
        });
        let text = render::toc_page(&header, cli.maxdepth, &toplevels);
        file_handler::write_stub(
            &cli.output_dir,
            "modules",
            suffix,
            &text,
            cli.force,
            cli.dry_run,
            quiet_mode,
        )?;
    }

    // Final flush of apidoc.log before exiting successfully.
    if !quiet_mode {
        if let Err(e) = logger::flush_global_logger() {
            eprintln!(
                "[WARNING] Failed to perform final flush of apidoc.log: {}",
                e
            );
        }
    }

    if quiet_mode {
        println!("Done.");
    } else {
        println!(
            "\nStub generation finished: {} page(s) considered. See 'apidoc.log' for verbose output.",
            toplevels.len()
        );
    }

    Ok(())
}
