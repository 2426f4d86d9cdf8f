//! Expansion of a wildcard import into an ordered candidate list.
//!
//! Precedence rule: extensions declared later win over extensions declared
//! earlier, so extension candidates are always listed last-declared first.
//! The base project's own copy, when it participates, is listed before any
//! extension.
//!
//! | Requester | Self-reference | Candidates |
//! |-----------|----------------|------------|
//! | base app | - | base, then every extension (reversed) |
//! | extension | no | base, then every extension (reversed) |
//! | extension | yes | only extensions declared after the requester (reversed) |

use storefront_extensions::ExtensionRegistry;
use storefront_fs::NormalizedPath;

use crate::request::{ImportRequest, ImportSource};

/// The outcome of expanding one wildcard import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePlan {
    /// Specifier with the wildcard prefix stripped.
    pub fragment: String,
    /// Who asked.
    pub source: ImportSource,
    /// Whether the requester asked for a path in its own tree.
    pub self_reference: bool,
    /// Candidate paths, highest precedence first.
    pub candidates: Vec<NormalizedPath>,
}

/// Build the ordered candidate list for `request`.
///
/// Returns `None` when the specifier is not a wildcard import. This function
/// never touches the filesystem.
///
/// ```
/// use storefront_extensions::ExtensionRegistry;
/// use storefront_fs::NormalizedPath;
/// use storefront_resolver::{ImportRequest, build_candidate_paths};
///
/// let registry = ExtensionRegistry::from_names(["extension-a", "extension-b"]);
/// let project = NormalizedPath::new("/p");
/// let request = ImportRequest::new("*/app/routes", "/p/app/main.jsx");
///
/// let plan = build_candidate_paths(&request, &registry, &project).unwrap();
/// let paths: Vec<&str> = plan.candidates.iter().map(|c| c.as_str()).collect();
/// assert_eq!(
///     paths,
///     vec![
///         "/p/app/routes",
///         "/p/node_modules/extension-b/app/routes",
///         "/p/node_modules/extension-a/app/routes",
///     ]
/// );
/// ```
pub fn build_candidate_paths(
    request: &ImportRequest,
    registry: &ExtensionRegistry,
    project_dir: &NormalizedPath,
) -> Option<CandidatePlan> {
    let fragment = request.fragment()?;
    let source = request.source(registry);
    let self_reference = request.is_self_reference();

    let enabled = registry.enabled_names();
    let extension_candidate =
        |package: &str| project_dir.join("node_modules").join(package).join(&fragment);

    let candidates: Vec<NormalizedPath> = match &source {
        ImportSource::Extension { index, .. } if self_reference => enabled[index + 1..]
            .iter()
            .rev()
            .map(|package| extension_candidate(package))
            .collect(),
        ImportSource::Base | ImportSource::Extension { .. } => {
            std::iter::once(project_dir.join(&fragment))
                .chain(
                    enabled
                        .iter()
                        .rev()
                        .map(|package| extension_candidate(package)),
                )
                .collect()
        }
    };

    tracing::debug!(
        specifier = %request.specifier,
        requester = %request.requester,
        ?source,
        self_reference,
        count = candidates.len(),
        "Built candidate paths"
    );

    Some(CandidatePlan {
        fragment,
        source,
        self_reference,
        candidates,
    })
}
