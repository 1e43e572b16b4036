use std::collections::BTreeSet;
use std::path::PathBuf;

use super::error::DiscoverError;
use crate::introspect::FailurePolicy;

//─────────────────────────────────────────────────────────────────────────────

/// Configuration for one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Include names starting with the private-name marker.
    pub include_private: bool,
    /// Consult each package's declared export list to filter and override.
    pub respect_exports: bool,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Absolute, normalized paths (files or directories) to prune entirely.
    pub exclusions: BTreeSet<PathBuf>,
    /// What to do when a package cannot be probed.
    pub failure_policy: FailurePolicy,
}

impl DiscoveryOptions {
    /// Rejects option combinations that would produce an inconsistent
    /// surface: private inclusion trusts the filesystem while export lists
    /// trust a possibly-incomplete declaration, and honoring both at once
    /// would silently mix the two.
    ///
    /// # Errors
    /// Returns `DiscoverError::ConflictingOptions` before any walk begins.
    pub fn validate(&self) -> Result<(), DiscoverError> {
        if self.include_private && self.respect_exports {
            return Err(DiscoverError::ConflictingOptions(
                "either include_private or respect_exports may be set, not both".into(),
            ));
        }
        Ok(())
    }
}

//─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_and_exports_do_not_compose() {
        let options = DiscoveryOptions {
            include_private: true,
            respect_exports: true,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(DiscoverError::ConflictingOptions(_))
        ));
    }

    #[test]
    fn either_policy_alone_is_valid() {
        for (include_private, respect_exports) in [(false, false), (true, false), (false, true)] {
            let options = DiscoveryOptions {
                include_private,
                respect_exports,
                ..Default::default()
            };
            assert!(options.validate().is_ok());
        }
    }
}
