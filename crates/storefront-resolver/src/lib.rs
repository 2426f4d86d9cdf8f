//! Override resolution for storefront projects.
//!
//! A wildcard import such as `*/app/components/header` asks the toolkit to
//! pick, among the base project and every enabled extension package, the
//! copy of `app/components/header` that wins under declared precedence.
//!
//! The work is split in three layers:
//!
//! - [`candidates`]: pure expansion of one import into an ordered list of
//!   candidate paths
//! - [`resolver`]: probes candidates in order against a [`FileProbe`]
//!   and returns the first hit
//! - [`transform`]: rewrites wildcard specifiers in module source, with
//!   per-compilation idempotence tracking
//!
//! [`FileProbe`]: storefront_fs::FileProbe

pub mod ast;
pub mod candidates;
pub mod error;
pub mod request;
pub mod resolver;
pub mod transform;

pub use ast::{ImportKind, ImportNode, ModuleAst, NodeId, Syntax};
pub use candidates::{CandidatePlan, build_candidate_paths};
pub use error::{Error, Result};
pub use request::{ImportRequest, ImportSource, WILDCARD_PREFIX};
pub use resolver::{OverrideResolver, ResolverOptions};
pub use transform::{CompilationContext, ImportTransform};
