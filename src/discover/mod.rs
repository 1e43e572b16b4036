// error module
mod error;
// options module
mod options;
// resolver module
mod resolver;
// walker module
mod walker;

// filter module, shared with the introspection layer for the marker-file
// constant and path normalization
pub(crate) mod filter;

//─────────────────────────────────────────────────────────────────────────────
// Public re-exports from the discovery modules.
//─────────────────────────────────────────────────────────────────────────────
pub use error::DiscoverError;
pub use filter::{normalize_excludes, normalize_path};
pub use options::DiscoveryOptions;
pub use resolver::{discover, Discovery, PackageUnit};
