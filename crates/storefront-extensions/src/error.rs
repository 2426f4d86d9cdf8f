use std::path::PathBuf;

/// Errors that can occur in the extension system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Extension package name does not follow the naming rule.
    #[error("invalid extension name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A configuration layer could not be read or parsed.
    #[error("failed to load project config layer {path}: {source}")]
    ConfigLayer {
        path: PathBuf,
        #[source]
        source: storefront_fs::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
