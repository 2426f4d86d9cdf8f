//! Runtime half of the storefront extensibility toolkit.
//!
//! - [`query`]: the canonical query-string codec used by SSR request
//!   processing
//! - [`request`]: strips configured parameters from incoming requests
//! - [`component`], [`hoc`]: typed components with companion statics and
//!   ordered higher-order-component chaining
//! - [`extension`], [`bootstrap`]: application extensions and their
//!   composition in declared precedence order

pub mod bootstrap;
pub mod component;
pub mod error;
pub mod extension;
pub mod hoc;
pub mod logging;
pub mod query;
pub mod request;

pub use bootstrap::{Bootstrapped, ExtensionCatalog, ExtensionFactory, ExtensionSet};
pub use component::{Component, Props, StaticValue, Statics};
pub use error::{Error, Result, Stage};
pub use extension::{ApplicationExtension, ExtensionBase, ExtensionError, Route, ServerOptions};
pub use hoc::{Hoc, apply_hocs};
pub use query::{QueryParameter, QueryParameters};
pub use request::{ProcessedRequest, RequestProcessor};
