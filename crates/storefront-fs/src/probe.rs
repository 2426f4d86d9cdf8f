//! Synchronous file existence queries
//!
//! The override resolver only ever asks one question of the filesystem:
//! "is there a file here?". Keeping that behind a trait lets the resolver be
//! driven by an in-memory tree in tests and by the real disk everywhere else.

use std::collections::BTreeSet;

use crate::NormalizedPath;

/// Answers file existence queries for the override resolver.
///
/// Implementations must be side-effect free; the resolver calls this in
/// strict candidate order and stops at the first hit.
pub trait FileProbe {
    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &NormalizedPath) -> bool;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileProbe;

impl FileProbe for OsFileProbe {
    fn is_file(&self, path: &NormalizedPath) -> bool {
        let found = path.is_file();
        tracing::trace!(path = %path, found, "Probed file");
        found
    }
}

/// A fixed set of files, for resolving against a virtual tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileProbe {
    files: BTreeSet<NormalizedPath>,
}

impl MemoryFileProbe {
    /// Create an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file path.
    pub fn add(&mut self, path: impl Into<NormalizedPath>) -> &mut Self {
        self.files.insert(path.into());
        self
    }
}

impl<P: Into<NormalizedPath>> FromIterator<P> for MemoryFileProbe {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FileProbe for MemoryFileProbe {
    fn is_file(&self, path: &NormalizedPath) -> bool {
        self.files.contains(path)
    }
}

impl<T: FileProbe + ?Sized> FileProbe for &T {
    fn is_file(&self, path: &NormalizedPath) -> bool {
        (**self).is_file(path)
    }
}
