//! Shared test utilities for the storefront extensibility workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`project::TestProject`] builder for on-disk storefront projects

pub mod project;
