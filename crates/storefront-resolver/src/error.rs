//! Error types for storefront-resolver

use std::path::PathBuf;

use crate::ast::Syntax;

/// Result type for storefront-resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or rewriting wildcard imports
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No candidate for a wildcard import exists on disk.
    #[error(
        "cannot resolve '{specifier}' imported from {}; tried:{}",
        .requester.display(),
        render_candidates(.candidates)
    )]
    UnresolvedImport {
        specifier: String,
        requester: PathBuf,
        candidates: Vec<PathBuf>,
    },

    /// A wildcard import with nothing after the prefix.
    #[error("empty wildcard import in {}", .requester.display())]
    EmptyWildcard { requester: PathBuf },

    /// The tree-sitter grammar was rejected by the parser.
    #[error("failed to load the {syntax} grammar: {source}")]
    Grammar {
        syntax: Syntax,
        #[source]
        source: tree_sitter::LanguageError,
    },

    /// The parser gave up without producing a tree.
    #[error("failed to parse {syntax} module")]
    Parse { syntax: Syntax },

    /// Filesystem error from storefront-fs
    #[error(transparent)]
    Fs(#[from] storefront_fs::Error),
}

fn render_candidates(candidates: &[PathBuf]) -> String {
    if candidates.is_empty() {
        return " (no candidates)".to_string();
    }
    candidates
        .iter()
        .map(|c| format!("\n  {}", c.display()))
        .collect()
}
