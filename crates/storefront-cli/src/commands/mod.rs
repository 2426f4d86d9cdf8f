//! Command implementations for storefront-cli

pub mod extensions;
pub mod query;
pub mod resolve;

pub use extensions::run_extensions;
pub use query::run_query;
pub use resolve::{run_candidates, run_resolve, run_rewrite};
