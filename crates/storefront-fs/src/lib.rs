//! Filesystem abstraction for the storefront extensibility toolkit
//!
//! Provides normalized path handling, synchronous file probing for the
//! override resolver, and format-agnostic config loading.

pub mod config;
pub mod error;
pub mod path;
pub mod probe;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use probe::{FileProbe, MemoryFileProbe, OsFileProbe};
