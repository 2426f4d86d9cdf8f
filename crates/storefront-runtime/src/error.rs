//! Error types for storefront-runtime

use std::fmt;

use crate::extension::ExtensionError;

/// Result type for storefront-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bootstrap step during which an extension failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Construct,
    ExtendApp,
    ExtendRoutes,
    ExtendServer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Construct => "construct",
            Self::ExtendApp => "extend_app",
            Self::ExtendRoutes => "extend_routes",
            Self::ExtendServer => "extend_server",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while composing an application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A higher-order component produced no component.
    #[error("higher-order component '{hoc}' at position {index} returned nothing")]
    HocReturnedNothing { index: usize, hoc: String },

    /// An extension failed during bootstrap; the app is not usable.
    #[error("extension '{extension}' failed during {stage}: {source}")]
    Bootstrap {
        extension: String,
        stage: Stage,
        #[source]
        source: ExtensionError,
    },

    /// Extension registry error from storefront-extensions
    #[error(transparent)]
    Extensions(#[from] storefront_extensions::Error),
}
