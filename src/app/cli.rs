use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Looks recursively in <MODULE_PATH> for Python modules and packages and \
             creates one reST stub file with automodule directives per package.",
    long_about = None
)]
pub struct Cli {
    /// Directory tree to search for Python modules and packages
    pub module_path: PathBuf,

    /// Files and/or directories to exclude from generation
    pub exclude_paths: Vec<PathBuf>,

    /// Directory to place all output
    #[clap(short = 'o', long = "output-dir")]
    pub output_dir: PathBuf,

    /// Maximum depth of submodules to show in the TOC
    #[clap(short = 'd', long, default_value_t = 4)]
    pub maxdepth: usize,

    /// Overwrite existing files
    #[clap(short, long)]
    pub force: bool,

    /// Follow symbolic links
    #[clap(short = 'l', long = "follow-links")]
    pub follow_links: bool,

    /// Run without creating files
    #[clap(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Put documentation for each module on its own page
    #[clap(short = 'e', long = "separate")]
    pub separate_modules: bool,

    /// Don't create headings for the modules/packages
    #[clap(short = 'E', long = "no-headings")]
    pub no_headings: bool,

    /// Put module documentation before submodule documentation
    #[clap(short = 'M', long = "module-first")]
    pub module_first: bool,

    /// Include "_private" modules
    #[clap(short = 'P', long = "private")]
    pub include_private: bool,

    /// Don't create a table of contents file
    #[clap(short = 'T', long = "no-toc")]
    pub no_toc: bool,

    /// File suffix for generated stubs
    #[clap(short, long, default_value = "rst")]
    pub suffix: String,

    /// Project name used as the TOC header (default: root directory name)
    #[clap(short = 'H', long = "doc-project")]
    pub header: Option<String>,

    /// Respect __all__ when looking for modules
    #[clap(long = "respect-all")]
    pub respect_all: bool,

    /// Abort on the first package that cannot be introspected
    #[clap(long)]
    pub strict: bool,

    /// Suppress verbose output, only printing 'Done.' on success or errors.
    #[clap(short, long)]
    pub quiet: bool,
}
