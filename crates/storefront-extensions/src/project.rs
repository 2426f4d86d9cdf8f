//! Project configuration with hierarchical merge
//!
//! Configuration is loaded and merged from these sources (later sources
//! override earlier):
//!
//! 1. **Global defaults** - `<config_dir>/storefront/config.toml`
//! 2. **Project config** - `storefront.toml` (or `.json`, `.yaml`, `.yml`)
//! 3. **Local overrides** - `storefront.local.toml` (git-ignored)
//!
//! # Example
//!
//! ```toml
//! [app]
//! extensions = ["extension-a", ["@acme/extension-b", { enabled = true }]]
//!
//! [resolver]
//! extensions = [".ts", ".tsx", ".js", ".jsx", ".json"]
//!
//! [ssr]
//! strip_parameters = ["gclid"]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use storefront_fs::{ConfigStore, NormalizedPath};

use crate::entry::ExtensionEntry;
use crate::error::{Error, Result};
use crate::registry::ExtensionRegistry;

/// Stem of the project config file.
pub const PROJECT_CONFIG_STEM: &str = "storefront";

/// Local override file, never committed.
pub const LOCAL_CONFIG_FILE: &str = "storefront.local.toml";

/// File extensions probed when resolving an extensionless module path.
pub const DEFAULT_RESOLVE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".json"];

/// `[app]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSection {
    /// Declared extensions, in precedence order.
    ///
    /// A layer that sets this replaces the list from earlier layers; lists
    /// are never concatenated because their order is meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<ExtensionEntry>>,
}

/// `[resolver]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolverSection {
    /// File extensions tried, in order, after the bare candidate path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

/// `[ssr]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SsrSection {
    /// Query parameters removed from every incoming request.
    #[serde(default)]
    pub strip_parameters: Vec<String>,
}

/// Project configuration parsed from one layer, or merged from all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub resolver: ResolverSection,
    #[serde(default)]
    pub ssr: SsrSection,
}

impl ProjectConfig {
    /// Parse a single layer from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Merge another layer into this one; `other` takes precedence.
    ///
    /// - `app.extensions`: replaced when `other` sets it
    /// - `resolver.extensions`: replaced when `other` sets it
    /// - `ssr.strip_parameters`: extended with unique values
    pub fn merge(&mut self, other: &ProjectConfig) {
        if let Some(extensions) = &other.app.extensions {
            self.app.extensions = Some(extensions.clone());
        }

        if let Some(extensions) = &other.resolver.extensions {
            self.resolver.extensions = Some(extensions.clone());
        }

        for key in &other.ssr.strip_parameters {
            if !self
                .ssr
                .strip_parameters
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(key))
            {
                self.ssr.strip_parameters.push(key.clone());
            }
        }
    }

    /// The configured extensions as a registry.
    pub fn registry(&self) -> ExtensionRegistry {
        ExtensionRegistry::new(self.app.extensions.clone().unwrap_or_default())
    }

    /// File extensions the resolver probes, falling back to the defaults.
    pub fn resolve_extensions(&self) -> Vec<String> {
        match &self.resolver.extensions {
            Some(extensions) => extensions.clone(),
            None => DEFAULT_RESOLVE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Resolves project configuration by merging all layers.
pub struct ProjectConfigResolver {
    project_dir: NormalizedPath,
    store: ConfigStore,

    /// Override for the global config directory (used for testing).
    /// When `None`, the platform-appropriate directory is used via `dirs::config_dir()`.
    global_config_dir_override: Option<PathBuf>,
}

impl ProjectConfigResolver {
    /// Create a resolver for the project rooted at `project_dir`.
    pub fn new(project_dir: NormalizedPath) -> Self {
        Self {
            project_dir,
            store: ConfigStore::new(),
            global_config_dir_override: None,
        }
    }

    /// Create a resolver with a custom global config directory.
    pub fn with_global_config_dir(project_dir: NormalizedPath, global_config_dir: PathBuf) -> Self {
        Self {
            global_config_dir_override: Some(global_config_dir),
            ..Self::new(project_dir)
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("storefront"))
    }

    /// Path of the project config layer, if one exists.
    pub fn project_config_path(&self) -> Option<NormalizedPath> {
        self.store.find(&self.project_dir, PROJECT_CONFIG_STEM)
    }

    /// Resolve the configuration by merging all layers.
    ///
    /// Missing layers are skipped. A layer that fails to parse is an error,
    /// as is any extension name that breaks the naming rule.
    pub fn resolve(&self) -> Result<ProjectConfig> {
        let mut config = ProjectConfig::default();

        if let Some(global_dir) = self.global_config_dir() {
            let global_path = NormalizedPath::new(global_dir.join("config.toml"));
            if global_path.is_file() {
                tracing::debug!(path = %global_path, "Loading global config (layer 1)");
                config.merge(&self.load_layer(&global_path)?);
            } else {
                tracing::debug!(path = %global_path, "No global config found (layer 1), skipping");
            }
        }

        if let Some(project_path) = self.project_config_path() {
            tracing::debug!(path = %project_path, "Loading project config (layer 2)");
            config.merge(&self.load_layer(&project_path)?);
        }

        let local_path = self.project_dir.join(LOCAL_CONFIG_FILE);
        if local_path.is_file() {
            tracing::debug!(path = %local_path, "Loading local config (layer 3)");
            config.merge(&self.load_layer(&local_path)?);
        }

        config.registry().validate()?;
        Ok(config)
    }

    fn load_layer(&self, path: &NormalizedPath) -> Result<ProjectConfig> {
        self.store.load(path).map_err(|source| Error::ConfigLayer {
            path: path.to_native(),
            source,
        })
    }

    /// Project root directory.
    pub fn project_dir(&self) -> &NormalizedPath {
        &self.project_dir
    }

    /// Whether a project config layer exists.
    pub fn has_config(&self) -> bool {
        self.project_config_path().is_some()
    }

    /// Whether local overrides exist.
    pub fn has_local_overrides(&self) -> bool {
        self.project_dir.join(LOCAL_CONFIG_FILE).is_file()
    }
}
