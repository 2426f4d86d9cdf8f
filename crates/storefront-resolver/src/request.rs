//! A single import to resolve, and who is asking for it.

use storefront_extensions::{EXTENSION_MARKER, ExtensionRegistry};
use storefront_fs::NormalizedPath;

/// Prefix that routes an import through override resolution.
pub const WILDCARD_PREFIX: &str = "*/";

/// One import as seen by the module-resolution hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// The specifier exactly as written in source, e.g. `*/app/routes`.
    pub specifier: String,
    /// The file containing the import.
    pub requester: NormalizedPath,
}

impl ImportRequest {
    pub fn new(specifier: impl Into<String>, requester: impl Into<NormalizedPath>) -> Self {
        Self {
            specifier: specifier.into(),
            requester: requester.into(),
        }
    }

    /// Whether the specifier carries the wildcard prefix.
    pub fn is_wildcard(&self) -> bool {
        self.specifier.starts_with(WILDCARD_PREFIX)
    }

    /// The specifier with the wildcard prefix stripped and normalized.
    ///
    /// `None` for ordinary imports.
    pub fn fragment(&self) -> Option<String> {
        self.specifier
            .strip_prefix(WILDCARD_PREFIX)
            .map(|rest| NormalizedPath::new(rest).as_str().to_string())
    }

    /// Classify the requesting file.
    ///
    /// A requester whose path mentions `extension-` is attributed to the
    /// enabled extension whose `node_modules/<package>/` directory contains
    /// it. When no enabled extension owns the path, the requester is
    /// treated as base-app code.
    pub fn source(&self, registry: &ExtensionRegistry) -> ImportSource {
        if !self.requester.contains(EXTENSION_MARKER) {
            return ImportSource::Base;
        }
        match registry.find_by_path(&self.requester) {
            Some((index, entry)) => ImportSource::Extension {
                index,
                package: entry.package().to_string(),
            },
            None => {
                tracing::warn!(
                    requester = %self.requester,
                    "Requester looks like extension code but matches no enabled extension; treating as base app"
                );
                ImportSource::Base
            }
        }
    }

    /// Whether the import asks for a path inside the requester's own tree.
    pub fn is_self_reference(&self) -> bool {
        match self.fragment() {
            Some(fragment) if !fragment.is_empty() => self.requester.contains(&fragment),
            _ => false,
        }
    }
}

/// Where a wildcard import comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Base project code.
    Base,
    /// Code inside an enabled extension package.
    Extension {
        /// Index among the registry's enabled entries.
        index: usize,
        package: String,
    },
}

impl ImportSource {
    pub fn is_extension(&self) -> bool {
        matches!(self, Self::Extension { .. })
    }
}
