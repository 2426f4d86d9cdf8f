//! Loading and composing the configured application extensions.
//!
//! Extensions are compiled into the server binary and registered in an
//! [`ExtensionCatalog`] by package name. [`ExtensionSet::load`] instantiates
//! the enabled entries of a registry, in declared order, and the `extend_*`
//! methods thread the application through each of them. Any failure stops
//! bootstrap.

use std::collections::HashMap;

use axum::Router;
use storefront_extensions::{ExtensionConfig, ExtensionRegistry};

use crate::component::Component;
use crate::error::{Error, Result, Stage};
use crate::extension::{ApplicationExtension, ExtensionError, Route, ServerOptions};
use crate::hoc::hoist_statics;

/// Constructor registered for one extension package.
pub type ExtensionFactory =
    fn(ServerOptions, ExtensionConfig) -> std::result::Result<Box<dyn ApplicationExtension>, ExtensionError>;

/// Package name to constructor.
#[derive(Default)]
pub struct ExtensionCatalog {
    factories: HashMap<String, ExtensionFactory>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `package`, replacing any earlier registration.
    pub fn register(&mut self, package: impl Into<String>, factory: ExtensionFactory) -> &mut Self {
        self.factories.insert(package.into(), factory);
        self
    }

    pub fn contains(&self, package: &str) -> bool {
        self.factories.contains_key(package)
    }

    pub fn get(&self, package: &str) -> Option<ExtensionFactory> {
        self.factories.get(package).copied()
    }

    /// Registered package names, sorted.
    pub fn packages(&self) -> Vec<&str> {
        let mut packages: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        packages.sort_unstable();
        packages
    }
}

struct LoadedExtension {
    package: String,
    instance: Box<dyn ApplicationExtension>,
}

/// Result of a full bootstrap.
pub struct Bootstrapped {
    pub app: Component,
    pub routes: Vec<Route>,
    pub router: Router,
}

/// Instantiated extensions in declared order.
#[derive(Default)]
pub struct ExtensionSet {
    extensions: Vec<LoadedExtension>,
}

impl ExtensionSet {
    /// Instantiate every enabled entry of `registry` that has a factory.
    pub fn load(
        registry: &ExtensionRegistry,
        catalog: &ExtensionCatalog,
        server_options: &ServerOptions,
    ) -> Result<Self> {
        registry.validate()?;

        let mut extensions = Vec::new();
        for entry in registry.enabled() {
            let package = entry.package();
            let Some(factory) = catalog.get(package) else {
                tracing::warn!(package, "No factory registered, skipping extension");
                continue;
            };
            let instance = factory(server_options.clone(), entry.config()).map_err(|source| {
                Error::Bootstrap {
                    extension: package.to_string(),
                    stage: Stage::Construct,
                    source,
                }
            })?;
            tracing::debug!(package, name = instance.name(), "Loaded extension");
            extensions.push(LoadedExtension {
                package: package.to_string(),
                instance,
            });
        }

        Ok(Self { extensions })
    }

    /// Loaded package names in declared order.
    pub fn packages(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.package.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Thread `init` through `hook` of every extension, first declared
    /// first.
    fn fold<T>(
        &self,
        stage: Stage,
        init: T,
        hook: impl Fn(&dyn ApplicationExtension, T) -> std::result::Result<T, ExtensionError>,
    ) -> Result<T> {
        self.extensions.iter().try_fold(init, |acc, ext| {
            tracing::trace!(package = %ext.package, %stage, "Running extension hook");
            hook(ext.instance.as_ref(), acc).map_err(|source| Error::Bootstrap {
                extension: ext.package.clone(),
                stage,
                source,
            })
        })
    }

    /// Wrap `app` with every extension. Statics of each inner layer are
    /// hoisted onto its wrapper.
    pub fn extend_app(&self, app: Component) -> Result<Component> {
        self.fold(Stage::ExtendApp, app, |ext, inner| {
            let mut outer = ext.extend_app(inner.clone())?;
            hoist_statics(&mut outer, &inner);
            Ok(outer)
        })
    }

    pub fn extend_routes(&self, routes: Vec<Route>) -> Result<Vec<Route>> {
        self.fold(Stage::ExtendRoutes, routes, |ext, routes| ext.extend_routes(routes))
    }

    pub fn extend_server(&self, router: Router) -> Result<Router> {
        self.fold(Stage::ExtendServer, router, |ext, router| ext.extend_server(router))
    }

    /// Run all three stages.
    pub fn bootstrap(&self, app: Component, routes: Vec<Route>, router: Router) -> Result<Bootstrapped> {
        let app = self.extend_app(app)?;
        let routes = self.extend_routes(routes)?;
        let router = self.extend_server(router)?;
        tracing::info!(extensions = self.len(), routes = routes.len(), "Application bootstrapped");
        Ok(Bootstrapped { app, routes, router })
    }
}
