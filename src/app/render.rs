//! Pure reST text generation for package pages, module pages and the table
//! of contents. No I/O; the orchestrator decides where the text goes.

use crate::discover::PackageUnit;

/// automodule options emitted for every directive.
const OPTIONS: [&str; 3] = ["members", "undoc-members", "show-inheritance"];

/// Page-layout switches, straight from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Put documentation for each submodule on its own page, linked from a
    /// toctree in the package page.
    pub separate_modules: bool,
    /// Don't create headings for modules, e.g. when the docstrings already
    /// contain them. The package heading itself is always written.
    pub no_headings: bool,
    /// Put the package's own module documentation before its submodules.
    pub module_first: bool,
}

/// Creates a heading of the given level (1 to 3 supported).
pub fn format_heading(level: usize, text: &str) -> String {
    let underline_char = match level {
        1 => '=',
        2 => '-',
        _ => '~',
    };
    let underline: String = underline_char.to_string().repeat(text.chars().count());
    format!("{text}\n{underline}\n\n")
}

/// Creates the automodule directive and adds the options.
pub fn format_directive(module: &str) -> String {
    let mut directive = format!(".. automodule:: {module}\n");
    for option in OPTIONS {
        directive.push_str(&format!("    :{option}:\n"));
    }
    directive
}

/// Builds the stub page for a single module, loose or separate.
pub fn module_page(module: &str, options: &RenderOptions) -> String {
    let mut text = String::new();
    if !options.no_headings {
        text.push_str(&format_heading(1, &format!("{module} module")));
    }
    text.push_str(&format_directive(module));
    text
}

/// Builds the stub page for one package unit: a Subpackages toctree, the
/// submodules (inline, or as a toctree when each gets its own page), and the
/// package's own module contents, first or last.
pub fn package_page(unit: &PackageUnit, options: &RenderOptions) -> String {
    let mut text = format_heading(1, &format!("{} package", unit.dotted_name));

    if options.module_first {
        text.push_str(&format_directive(&unit.dotted_name));
        text.push('\n');
    }

    if !unit.direct_subpackages.is_empty() {
        text.push_str(&format_heading(2, "Subpackages"));
        text.push_str(".. toctree::\n\n");
        for subpackage in &unit.direct_subpackages {
            text.push_str(&format!("    {}.{}\n", unit.dotted_name, subpackage));
        }
        text.push('\n');
    }

    if !unit.direct_submodules.is_empty() {
        text.push_str(&format_heading(2, "Submodules"));
        if options.separate_modules {
            text.push_str(".. toctree::\n\n");
            for submodule in &unit.direct_submodules {
                text.push_str(&format!("   {}.{}\n", unit.dotted_name, submodule));
            }
        } else {
            for submodule in &unit.direct_submodules {
                let dotted = format!("{}.{}", unit.dotted_name, submodule);
                if !options.no_headings {
                    text.push_str(&format_heading(2, &format!("{dotted} module")));
                }
                text.push_str(&format_directive(&dotted));
                text.push('\n');
            }
        }
        text.push('\n');
    }

    if !options.module_first {
        text.push_str(&format_heading(2, "Module contents"));
        text.push_str(&format_directive(&unit.dotted_name));
    }
    text
}

/// Builds the table-of-contents page. Entries that merely extend a previous
/// entry by a dotted segment are suppressed; their parent's page already
/// links them.
pub fn toc_page(header: &str, maxdepth: usize, toplevels: &[String]) -> String {
    let mut text = format_heading(1, header);
    text.push_str(".. toctree::\n");
    text.push_str(&format!("   :maxdepth: {maxdepth}\n\n"));

    let mut sorted: Vec<&String> = toplevels.iter().collect();
    sorted.sort();
    let mut previous = String::new();
    for module in sorted {
        if !previous.is_empty() && module.starts_with(&format!("{previous}.")) {
            continue;
        }
        previous = (*module).clone();
        text.push_str(&format!("   {module}\n"));
    }
    text
}

//─────────────────────────────────────────────────────────────────────────────
