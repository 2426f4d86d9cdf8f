//! Module-resolution hook for wildcard imports.
//!
//! Ordinary imports pass straight through (`Ok(None)`) so the bundler's own
//! resolution handles them. Wildcard imports are expanded with
//! [`build_candidate_paths`] and probed one candidate at a time, in order;
//! the first existing file wins.

use storefront_extensions::{ExtensionRegistry, ProjectConfig};
use storefront_extensions::project::DEFAULT_RESOLVE_EXTENSIONS;
use storefront_fs::{FileProbe, NormalizedPath, OsFileProbe};

use crate::candidates::{CandidatePlan, build_candidate_paths};
use crate::error::{Error, Result};
use crate::request::ImportRequest;

/// Settings for the override resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Base project root; `node_modules/` lives directly below it.
    pub project_dir: NormalizedPath,
    /// File extensions tried, in order, after the bare candidate.
    pub extensions: Vec<String>,
}

impl ResolverOptions {
    /// Options with the default extension list.
    pub fn new(project_dir: NormalizedPath) -> Self {
        Self {
            project_dir,
            extensions: DEFAULT_RESOLVE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    /// Options for an on-disk project, with the root made absolute.
    pub fn for_project(project_dir: &NormalizedPath, config: &ProjectConfig) -> Result<Self> {
        Ok(Self {
            project_dir: project_dir.canonicalize()?,
            extensions: config.resolve_extensions(),
        })
    }

    /// Replace the extension list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

/// Resolves wildcard imports against the base project and its extensions.
#[derive(Debug, Clone)]
pub struct OverrideResolver<P = OsFileProbe> {
    registry: ExtensionRegistry,
    options: ResolverOptions,
    probe: P,
}

impl OverrideResolver<OsFileProbe> {
    /// Create a resolver that probes the real filesystem.
    pub fn new(registry: ExtensionRegistry, options: ResolverOptions) -> Self {
        Self::with_probe(registry, options, OsFileProbe)
    }
}

impl<P: FileProbe> OverrideResolver<P> {
    /// Create a resolver with a custom file probe.
    pub fn with_probe(registry: ExtensionRegistry, options: ResolverOptions, probe: P) -> Self {
        Self {
            registry,
            options,
            probe,
        }
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Expand `request` without probing. `None` for ordinary imports.
    pub fn candidates(&self, request: &ImportRequest) -> Option<CandidatePlan> {
        build_candidate_paths(request, &self.registry, &self.options.project_dir)
    }

    /// Resolve `request` to an existing file.
    ///
    /// - `Ok(None)`: not a wildcard import, leave it alone
    /// - `Ok(Some(path))`: the winning file
    /// - `Err(UnresolvedImport)`: wildcard import with no existing candidate
    pub fn resolve(&self, request: &ImportRequest) -> Result<Option<NormalizedPath>> {
        let Some(plan) = self.candidates(request) else {
            return Ok(None);
        };

        if plan.fragment.is_empty() {
            return Err(Error::EmptyWildcard {
                requester: request.requester.to_native(),
            });
        }

        for candidate in &plan.candidates {
            if let Some(found) = self.probe_candidate(candidate) {
                tracing::debug!(
                    specifier = %request.specifier,
                    resolved = %found,
                    "Resolved wildcard import"
                );
                return Ok(Some(found));
            }
        }

        Err(Error::UnresolvedImport {
            specifier: request.specifier.clone(),
            requester: request.requester.to_native(),
            candidates: plan
                .candidates
                .iter()
                .map(NormalizedPath::to_native)
                .collect(),
        })
    }

    /// Try one candidate: as-is, with each extension, then as a directory
    /// with an `index` file.
    fn probe_candidate(&self, candidate: &NormalizedPath) -> Option<NormalizedPath> {
        std::iter::once(candidate.clone())
            .chain(
                self.options
                    .extensions
                    .iter()
                    .map(|ext| candidate.with_suffix(ext)),
            )
            .chain(
                self.options
                    .extensions
                    .iter()
                    .map(|ext| candidate.join(&format!("index{ext}"))),
            )
            .find(|path| {
                let hit = self.probe.is_file(path);
                tracing::trace!(path = %path, hit, "Probing candidate");
                hit
            })
    }
}
