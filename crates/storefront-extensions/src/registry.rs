//! Ordered registry of the extensions a project declares.
//!
//! Declaration order is precedence order: an entry declared later can
//! override files and wrap components contributed by entries declared
//! earlier. The registry never reorders or deduplicates on its own.

use std::collections::HashSet;

use storefront_fs::NormalizedPath;

use crate::entry::ExtensionEntry;
use crate::error::{Error, Result};
use crate::name::ExtensionName;

/// Ordered, immutable list of configured extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionRegistry {
    entries: Vec<ExtensionEntry>,
}

impl ExtensionRegistry {
    /// Create a registry from the configured list, as-is.
    pub fn new(entries: Vec<ExtensionEntry>) -> Self {
        Self { entries }
    }

    /// Create a registry from bare package names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            names
                .into_iter()
                .map(|name| ExtensionEntry::Name(name.as_ref().to_string()))
                .collect(),
        )
    }

    /// All entries, in declared order.
    pub fn entries(&self) -> &[ExtensionEntry] {
        &self.entries
    }

    /// Package names of all entries, in declared order.
    pub fn extension_names(&self) -> Vec<&str> {
        self.entries.iter().map(ExtensionEntry::package).collect()
    }

    /// Entries that are enabled, in declared order.
    ///
    /// Resolution and composition both work from this list, so a disabled
    /// extension is invisible to the whole toolkit.
    pub fn enabled(&self) -> impl DoubleEndedIterator<Item = &ExtensionEntry> {
        self.entries.iter().filter(|entry| entry.is_enabled())
    }

    /// Package names of enabled entries, in declared order.
    pub fn enabled_names(&self) -> Vec<&str> {
        self.enabled().map(ExtensionEntry::package).collect()
    }

    /// Index of `package` within [`enabled_names`](Self::enabled_names).
    pub fn position(&self, package: &str) -> Option<usize> {
        self.enabled().position(|entry| entry.package() == package)
    }

    /// Look up an entry by package name.
    pub fn get(&self, package: &str) -> Option<&ExtensionEntry> {
        self.entries.iter().find(|entry| entry.package() == package)
    }

    /// Identify the enabled extension whose package directory contains `path`.
    ///
    /// Matches on the `node_modules/<package>/` segment sequence. When a path
    /// runs through nested `node_modules` directories the innermost match
    /// wins. Returns the index among enabled entries.
    pub fn find_by_path(&self, path: &NormalizedPath) -> Option<(usize, &ExtensionEntry)> {
        let text = path.as_str();
        self.enabled()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let needle = format!("node_modules/{}/", entry.package());
                text.rfind(&needle).map(|at| (at, idx, entry))
            })
            .max_by_key(|(at, _, _)| *at)
            .map(|(_, idx, entry)| (idx, entry))
    }

    /// Check every entry against the naming rule and reject duplicates.
    ///
    /// The registry accepts whatever it is given; callers that need
    /// well-formed names call this once after loading.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            ExtensionName::parse(entry.package())?;
            if !seen.insert(entry.package()) {
                return Err(Error::InvalidName {
                    name: entry.package().to_string(),
                    reason: "declared more than once".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of configured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no extensions are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ExtensionEntry> for ExtensionRegistry {
    fn from_iter<I: IntoIterator<Item = ExtensionEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
