//! Application extensions.
//!
//! An extension can wrap the application component, edit the route list
//! and add server-side handlers. Every hook defaults to the identity, so an
//! extension only implements what it changes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_extensions::ExtensionConfig;

use crate::component::Component;

/// Error type extension hooks may return.
pub type ExtensionError = Box<dyn std::error::Error + Send + Sync>;

/// Server settings shared with every extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOptions {
    pub project_dir: PathBuf,
    pub port: u16,
    pub default_cache_time_seconds: u64,
    #[serde(flatten)]
    pub settings: BTreeMap<String, Value>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            port: 3000,
            default_cache_time_seconds: 600,
            settings: BTreeMap::new(),
        }
    }
}

/// A route of the application.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub component: Component,
    pub exact: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, component: Component) -> Self {
        Self {
            path: path.into(),
            component,
            exact: true,
        }
    }
}

/// Constructor inputs every extension keeps.
#[derive(Debug, Clone, Default)]
pub struct ExtensionBase {
    server_options: ServerOptions,
    config: ExtensionConfig,
}

impl ExtensionBase {
    pub fn new(server_options: ServerOptions, config: ExtensionConfig) -> Self {
        Self {
            server_options,
            config,
        }
    }
}

/// An application extension.
///
/// Hooks are called once per bootstrap, in declared order: the first
/// declared extension sees the base application, the last one sees
/// everybody else's changes.
pub trait ApplicationExtension: Send + Sync {
    fn base(&self) -> &ExtensionBase;

    fn config(&self) -> &ExtensionConfig {
        &self.base().config
    }

    fn server_options(&self) -> &ServerOptions {
        &self.base().server_options
    }

    /// Name used in logs and errors. Defaults to the type name.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Wrap the application component.
    fn extend_app(&self, app: Component) -> Result<Component, ExtensionError> {
        Ok(app)
    }

    /// Edit the route list.
    fn extend_routes(&self, routes: Vec<Route>) -> Result<Vec<Route>, ExtensionError> {
        Ok(routes)
    }

    /// Add server-side routes or middleware.
    fn extend_server(&self, router: Router) -> Result<Router, ExtensionError> {
        Ok(router)
    }
}
