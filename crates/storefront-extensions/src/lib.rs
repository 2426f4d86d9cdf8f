//! Extension registry for the storefront extensibility toolkit.
//!
//! This crate owns the ordered list of extension packages a project
//! declares, the naming rule every extension package follows, and the
//! layered loading of the project configuration that carries that list.

pub mod config;
pub mod entry;
pub mod error;
pub mod name;
pub mod project;
pub mod registry;

/// Marker every extension package name carries after its optional scope.
pub const EXTENSION_MARKER: &str = "extension-";

pub use config::ExtensionConfig;
pub use entry::ExtensionEntry;
pub use error::{Error, Result};
pub use name::ExtensionName;
pub use project::{AppSection, ProjectConfig, ProjectConfigResolver, ResolverSection, SsrSection};
pub use registry::ExtensionRegistry;
